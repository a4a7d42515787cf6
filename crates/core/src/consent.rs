//! Cookie consent

use std::{
    cell::Cell,
    fmt::{Debug, Formatter, Result as FmtResult},
    rc::Rc,
    time::Duration,
};

use tracing::warn;

use crate::{
    notifications::{Scheduler, TaskHandle},
    storage::{COOKIE_ACCEPTED_KEY, Storage, StorageError},
};

/// Persisted cookie consent flag.
#[derive(Debug, Clone)]
pub struct CookieConsent<S: Storage> {
    storage: S,
}

impl<S: Storage> CookieConsent<S> {
    /// Creates a consent flag over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Whether consent has been recorded. Any non-empty stored value counts;
    /// an empty value or a failed read counts as not accepted.
    pub fn is_accepted(&self) -> bool {
        match self.storage.get_item(COOKIE_ACCEPTED_KEY) {
            Ok(value) => value.is_some_and(|value| !value.is_empty()),
            Err(error) => {
                warn!(%error, "failed to read cookie consent");

                false
            }
        }
    }

    /// Records consent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the flag could not be written.
    pub fn accept(&self) -> Result<(), StorageError> {
        self.storage.set_item(COOKIE_ACCEPTED_KEY, "true")
    }
}

/// Cookie banner visibility, revealed after a delay unless consent exists.
pub struct CookieBanner<S: Storage> {
    consent: CookieConsent<S>,
    visible: Rc<Cell<bool>>,
    reveal: Option<TaskHandle>,
    on_change: Rc<dyn Fn(bool)>,
}

impl<S: Storage> Debug for CookieBanner<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CookieBanner")
            .field("visible", &self.visible.get())
            .field("reveal", &self.reveal)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> CookieBanner<S> {
    /// Initialises the banner, scheduling its reveal after `delay` when no
    /// consent has been recorded.
    pub fn init(consent: CookieConsent<S>, scheduler: &impl Scheduler, delay: Duration) -> Self {
        Self::init_with_listener(consent, scheduler, delay, |_| {})
    }

    /// Like [`CookieBanner::init`], calling `on_change` whenever visibility
    /// changes.
    pub fn init_with_listener(
        consent: CookieConsent<S>,
        scheduler: &impl Scheduler,
        delay: Duration,
        on_change: impl Fn(bool) + 'static,
    ) -> Self {
        let visible = Rc::new(Cell::new(false));
        let on_change: Rc<dyn Fn(bool)> = Rc::new(on_change);

        let reveal = (!consent.is_accepted()).then(|| {
            let visible = Rc::clone(&visible);
            let on_change = Rc::clone(&on_change);

            scheduler.schedule(
                delay,
                Box::new(move || {
                    visible.set(true);
                    on_change(true);
                }),
            )
        });

        Self {
            consent,
            visible,
            reveal,
            on_change,
        }
    }

    /// Whether the banner is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Records consent and hides the banner, cancelling a pending reveal.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if consent could not be persisted; the
    /// banner stays as it was.
    pub fn accept(&mut self) -> Result<(), StorageError> {
        self.consent.accept()?;

        if let Some(reveal) = self.reveal.take() {
            reveal.cancel();
        }

        if self.visible.replace(false) {
            (self.on_change)(false);
        }

        Ok(())
    }
}
