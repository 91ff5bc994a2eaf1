use faq_common::gemini::GeminiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    AnswerClient(#[from] GeminiClientError),
}
