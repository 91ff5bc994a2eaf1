use crate::model::FaqRecord;

/// A search query after normalization.
///
/// `raw` keeps the user's casing (it is what the answer service sees); `folded` is
/// only for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    folded: String,
}

impl Query {
    /// Trim and case-fold the input. Returns `None` when nothing is left.
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            folded: raw.to_lowercase(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring match against question or answer.
    pub fn matches(&self, record: &FaqRecord) -> bool {
        record.question.to_lowercase().contains(&self.folded)
            || record.answer.to_lowercase().contains(&self.folded)
    }
}

/// The Filtered View: matching records in store order.
pub fn filter<'a>(records: &'a [FaqRecord], query: &Query) -> Vec<&'a FaqRecord> {
    records.iter().filter(|r| query.matches(r)).collect()
}
