use std::io::{self, Write};

use tracing::warn;

use crate::model::{DisplayItem, Slug};

/// Output surfaces the controller drives.
///
/// Calls arrive in batches; `commit` marks the end of one batch so a view can
/// redraw once instead of per call.
pub trait FaqView: Send {
    /// Replace the visible list. Every item starts collapsed.
    fn render_list(&mut self, items: &[DisplayItem]);
    fn set_expanded(&mut self, slug: &Slug, expanded: bool);
    /// Bring a deep-linked item into view and highlight it.
    fn reveal(&mut self, _slug: &Slug) {}
    /// Rewrite the address fragment in place, without navigating. `None` clears it.
    fn replace_fragment(&mut self, fragment: Option<&Slug>);
    /// The address already changed to `fragment` (page load or outside navigation).
    /// The leading `#` is stripped.
    fn fragment_navigated(&mut self, _fragment: Option<&str>) {}
    fn set_answer_visible(&mut self, visible: bool);
    /// Already-sanitized markup for the answer region.
    fn set_answer_content(&mut self, markup: &str);
    fn set_loading(&mut self, loading: bool);
    fn commit(&mut self) {}
}

/// Line-oriented rendering of the widget for a terminal.
pub struct TerminalView<W> {
    out: W,
    items: Vec<DisplayItem>,
    expanded: Option<Slug>,
    fragment: Option<String>,
    highlighted: Option<Slug>,
    answer_visible: bool,
    answer_content: String,
    loading: bool,
    list_dirty: bool,
    answer_dirty: bool,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            items: Vec::new(),
            expanded: None,
            fragment: None,
            highlighted: None,
            answer_visible: false,
            answer_content: String::new(),
            loading: false,
            list_dirty: false,
            answer_dirty: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_list(&mut self) -> io::Result<()> {
        let location = self
            .fragment
            .as_ref()
            .map(|f| format!("#{f}"))
            .unwrap_or_default();
        writeln!(self.out, "== FAQ ({} shown) {location}", self.items.len())?;
        if self.items.is_empty() {
            writeln!(self.out, "   (no matching questions)")?;
        }
        for item in &self.items {
            let open = self.expanded.as_ref() == Some(&item.slug);
            let marker = if open { 'v' } else { '>' };
            let star = if self.highlighted.as_ref() == Some(&item.slug) { " *" } else { "" };
            writeln!(self.out, " {marker} {} [{}]{star}", item.question, item.slug)?;
            if open {
                writeln!(self.out, "     {}", item.answer)?;
            }
        }
        Ok(())
    }

    fn draw_answer(&mut self) -> io::Result<()> {
        if !self.answer_visible {
            return Ok(());
        }
        writeln!(self.out, "== Answer")?;
        if self.loading {
            writeln!(self.out, "   ...thinking")?;
        } else if !self.answer_content.is_empty() {
            writeln!(self.out, "   {}", self.answer_content)?;
        }
        Ok(())
    }
}

impl<W: Write + Send> FaqView for TerminalView<W> {
    fn render_list(&mut self, items: &[DisplayItem]) {
        self.items = items.to_vec();
        self.expanded = None;
        self.highlighted = None;
        self.list_dirty = true;
    }

    fn set_expanded(&mut self, slug: &Slug, expanded: bool) {
        if expanded {
            self.expanded = Some(slug.clone());
        } else if self.expanded.as_ref() == Some(slug) {
            self.expanded = None;
        }
        self.list_dirty = true;
    }

    fn reveal(&mut self, slug: &Slug) {
        self.highlighted = Some(slug.clone());
        self.list_dirty = true;
    }

    fn replace_fragment(&mut self, fragment: Option<&Slug>) {
        self.fragment = fragment.map(Slug::to_string);
        self.list_dirty = true;
    }

    fn fragment_navigated(&mut self, fragment: Option<&str>) {
        self.fragment = fragment.filter(|f| !f.is_empty()).map(str::to_string);
        self.list_dirty = true;
    }

    fn set_answer_visible(&mut self, visible: bool) {
        if self.answer_visible != visible {
            self.answer_visible = visible;
            self.answer_dirty = true;
        }
    }

    fn set_answer_content(&mut self, markup: &str) {
        self.answer_content = markup.to_string();
        self.answer_dirty = true;
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.answer_dirty = true;
        }
    }

    fn commit(&mut self) {
        let mut result = Ok(());
        if self.list_dirty {
            result = self.draw_list();
        }
        if result.is_ok() && self.answer_dirty {
            result = self.draw_answer();
        }
        if result.is_ok() {
            result = self.out.flush();
        }
        self.list_dirty = false;
        self.answer_dirty = false;
        if let Err(e) = result {
            warn!(error = %e, "failed to write widget output");
        }
    }
}
