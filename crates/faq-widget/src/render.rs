use std::collections::HashSet;

use tracing::warn;

use crate::model::{DisplayItem, FaqRecord};
use crate::slug::slugify;

/// Project records into collapsed display items keyed by slug.
///
/// Same input, same output. Expansion is never carried over; callers re-apply it.
pub fn render<'a, I>(records: I) -> Vec<DisplayItem>
where
    I: IntoIterator<Item = &'a FaqRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|record| {
            let slug = slugify(&record.question);
            if !seen.insert(slug.clone()) {
                warn!(slug = %slug, "duplicate FAQ slug in one render, deep links will be ambiguous");
            }
            DisplayItem {
                slug,
                question: record.question.clone(),
                answer: record.answer.clone(),
            }
        })
        .collect()
}
