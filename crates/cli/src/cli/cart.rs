use std::io;

use clap::Args;
use gran::{
    items::{LineItem, NewLineItem},
    view::{CartIconAction, clear_from_modal},
};
use rust_decimal::Decimal;

use super::{CommandError, Context, report};
use crate::render;

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product id
    #[arg(long)]
    id: String,

    /// Display name
    #[arg(long, default_value = "")]
    name: String,

    /// Unit price, e.g. `5000` or `1999.50`
    #[arg(long, allow_negative_numbers = true)]
    price: Decimal,

    /// Units to add
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Id of the line to remove
    #[arg(long)]
    id: String,
}

pub(crate) fn add(
    ctx: &Context,
    args: AddArgs,
    out: &mut impl io::Write,
) -> Result<(), CommandError> {
    let item = LineItem::try_from(NewLineItem {
        id: Some(args.id),
        name: Some(args.name),
        price: Some(args.price),
        quantity: Some(args.quantity),
    })?;

    let mut cart = ctx.cart();

    cart.add_item(item)?;

    report(&cart, out)?;
    writeln!(out, "items in cart: {}", cart.observer().counter)?;

    Ok(())
}

pub(crate) fn remove(
    ctx: &Context,
    args: &RemoveArgs,
    out: &mut impl io::Write,
) -> Result<(), CommandError> {
    let mut cart = ctx.cart();

    cart.remove_item(&args.id)?;

    writeln!(out, "items in cart: {}", cart.observer().counter)?;

    Ok(())
}

pub(crate) fn clear(ctx: &Context, out: &mut impl io::Write) -> Result<(), CommandError> {
    let mut cart = ctx.cart();

    clear_from_modal(&mut cart)?;

    report(&cart, out)?;

    Ok(())
}

pub(crate) fn show(ctx: &Context, out: &mut impl io::Write) -> Result<(), CommandError> {
    let mut cart = ctx.cart();

    match CartIconAction::resolve(&mut cart, ctx.currency) {
        CartIconAction::NotifyEmpty => report(&cart, out)?,
        CartIconAction::ShowModal(view) => writeln!(out, "{}", render::cart_table(&view))?,
    }

    Ok(())
}
