use std::fmt;

/// A static question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

impl FaqRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// URL-safe identifier derived from a question, used as the `#fragment` deep link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One rendered list entry. Always produced collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub slug: Slug,
    pub question: String,
    pub answer: String,
}

/// Result of asking the external answer service about one query.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// No usable credential; nothing was sent.
    SetupRequired,
    /// Text of the first candidate, unmodified.
    Answer(String),
    /// The service replied without a candidate.
    NoAnswer { feedback: Option<serde_json::Value> },
    /// Transport failure or non-success status.
    Failed(String),
}
