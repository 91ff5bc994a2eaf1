use tracing::warn;

use crate::model::{DisplayItem, Slug};

/// What the URL fragment should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentUpdate {
    Unchanged,
    /// Replace the fragment with `#slug` without navigating.
    Set(Slug),
    Clear,
}

/// Effects of one accordion transition, to be applied to the view in order:
/// collapse first, then expand, then touch the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub collapsed: Option<Slug>,
    pub expanded: Option<Slug>,
    pub fragment: FragmentUpdate,
}

/// Single-select expansion over the currently rendered items.
#[derive(Debug, Default)]
pub struct AccordionState {
    rendered: Vec<Slug>,
    expanded: Option<Slug>,
}

impl AccordionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new list was rendered. Everything starts collapsed.
    pub fn reset(&mut self, items: &[DisplayItem]) {
        self.rendered = items.iter().map(|item| item.slug.clone()).collect();
        self.expanded = None;
    }

    #[cfg(test)]
    pub fn expanded(&self) -> Option<&Slug> {
        self.expanded.as_ref()
    }

    /// User clicked an item header.
    ///
    /// Returns `None` when `slug` is not part of the current render.
    pub fn toggle(&mut self, slug: &str) -> Option<Transition> {
        let Some(target) = self.rendered.iter().find(|s| *s == slug).cloned() else {
            warn!(slug, "toggle for an item that is not rendered, ignoring");
            return None;
        };

        if self.expanded.as_ref() == Some(&target) {
            self.expanded = None;
            return Some(Transition {
                collapsed: Some(target),
                expanded: None,
                fragment: FragmentUpdate::Clear,
            });
        }

        let collapsed = self.expanded.replace(target.clone());
        Some(Transition {
            collapsed,
            expanded: Some(target.clone()),
            fragment: FragmentUpdate::Set(target),
        })
    }

    /// Page load or external navigation. Collapses everything, then expands the item
    /// whose slug equals the fragment (leading `#` optional), if any.
    pub fn apply_fragment(&mut self, fragment: Option<&str>) -> Transition {
        let collapsed = self.expanded.take();
        let wanted = fragment
            .map(|f| f.strip_prefix('#').unwrap_or(f))
            .filter(|f| !f.is_empty());

        let expanded = wanted.and_then(|f| self.rendered.iter().find(|s| *s == f).cloned());
        self.expanded = expanded.clone();

        Transition {
            collapsed,
            expanded,
            fragment: FragmentUpdate::Unchanged,
        }
    }
}
