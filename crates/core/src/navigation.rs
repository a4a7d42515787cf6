//! Navigation
//!
//! Page-level presentation state that does not touch the cart: the mobile
//! menu, scroll-position link highlighting and one-shot entrance reveals.

use rustc_hash::FxHashSet;
use serde::Deserialize;

/// Default distance above a section's top at which it becomes current.
pub const DEFAULT_SCROLL_OFFSET: f64 = 200.0;

/// Open/closed state of the mobile menu and its hamburger button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    /// Whether the menu is open.
    pub fn is_open(self) -> bool {
        self.open
    }

    /// Hamburger click.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// A link inside the menu was followed.
    pub fn handle_link_click(&mut self) {
        self.close();
    }

    /// A click landed somewhere on the document. Clicks outside the header
    /// and the menu close it.
    pub fn handle_document_click(&mut self, inside_menu: bool) {
        if !inside_menu {
            self.close();
        }
    }
}

/// Vertical position of a page section, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset {
    /// Section element id
    pub id: String,

    /// Distance from the top of the document, in pixels
    pub top: f64,
}

impl SectionOffset {
    /// Creates a section offset.
    pub fn new(id: impl Into<String>, top: f64) -> Self {
        Self { id: id.into(), top }
    }
}

/// Id of the section the reader is in: the last section, in document order,
/// whose top minus `offset` has been scrolled past.
pub fn active_section(sections: &[SectionOffset], scroll_y: f64, offset: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|section| scroll_y >= section.top - offset)
        .map(|section| section.id.as_str())
}

/// Whether a navigation link pointing at `href` (e.g. `"#catalog"`) refers to
/// the current section.
pub fn is_link_active(href: &str, current: Option<&str>) -> bool {
    let current = current.unwrap_or_default();
    let target = href.strip_prefix('#').unwrap_or(href);

    target == current
}

/// Intersection settings for entrance animations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,

    /// Margin applied to the viewport, CSS shorthand.
    pub root_margin: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
        }
    }
}

/// Tracks which elements have played their entrance animation. Reveals are
/// permanent: leaving the viewport again does not hide an element.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    revealed: FxHashSet<String>,
}

impl RevealTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a batch of intersection entries, returning ids revealed by
    /// this batch in entry order.
    pub fn observe<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Vec<String> {
        entries
            .into_iter()
            .filter(|(_, intersecting)| *intersecting)
            .filter_map(|(id, _)| self.revealed.insert(id.to_string()).then(|| id.to_string()))
            .collect()
    }

    /// Whether `id` has been revealed.
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}
