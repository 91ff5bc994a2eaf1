use crate::model::FaqRecord;

const EMBEDDED_FAQS: &[(&str, &str)] = &[
    (
        "How do I reset my password?",
        "To reset your password, go to the login page and click on 'Forgot Password'. Follow the instructions sent to your email.",
    ),
    (
        "What payment methods do you accept?",
        "We accept all major credit cards (Visa, MasterCard, Amex), PayPal, and Apple Pay.",
    ),
    (
        "Can I cancel my subscription?",
        "Yes, you can cancel your subscription at any time from your account settings. Your access will continue until the end of the billing period.",
    ),
    (
        "How do I contact support?",
        "You can reach our support team via email at support@example.com or use the live chat feature on our website.",
    ),
    (
        "Is there a free trial available?",
        "Yes, we offer a 14-day free trial for new users. No credit card is required to sign up.",
    ),
];

/// Read-only, ordered FAQ set fixed at startup.
#[derive(Debug, Clone)]
pub struct FaqStore {
    records: Vec<FaqRecord>,
}

impl FaqStore {
    pub fn new(records: Vec<FaqRecord>) -> Self {
        Self { records }
    }

    /// The FAQ set compiled into the binary.
    pub fn embedded() -> Self {
        Self::new(
            EMBEDDED_FAQS
                .iter()
                .map(|(question, answer)| FaqRecord::new(*question, *answer))
                .collect(),
        )
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slug::slugify;

    #[test]
    fn embedded_store_keeps_declared_order() {
        let store = FaqStore::embedded();
        assert_eq!(store.len(), 5);
        assert_eq!(store.records()[0].question, "How do I reset my password?");
        assert_eq!(store.records()[4].question, "Is there a free trial available?");
    }

    #[test]
    fn embedded_slugs_are_unique() {
        let store = FaqStore::embedded();
        let mut slugs: Vec<String> = store
            .records()
            .iter()
            .map(|r| slugify(&r.question).to_string())
            .collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), store.len());
    }
}
