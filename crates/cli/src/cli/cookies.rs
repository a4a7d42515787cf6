use std::io;

use gran::consent::CookieConsent;

use super::{CommandError, Context};

pub(crate) fn accept(ctx: &Context, out: &mut impl io::Write) -> Result<(), CommandError> {
    let consent = CookieConsent::new(ctx.storage.clone());

    if consent.is_accepted() {
        writeln!(out, "cookie consent already recorded")?;

        return Ok(());
    }

    consent.accept()?;

    writeln!(out, "cookie consent recorded")?;

    Ok(())
}
