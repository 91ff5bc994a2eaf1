use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use faq_common::gemini::{
    GeminiClient, GeminiClientConfig, GeminiClientError, GenerateContentRequest,
    GenerateContentResponse,
};

use crate::model::AnswerOutcome;

const PROMPT_PREAMBLE: &str = "You are a helpful customer support assistant for a generic tech company. \
Answer this question concisely (max 2-3 sentences): ";

pub fn support_prompt(query: &str) -> String {
    format!("{PROMPT_PREAMBLE}{query}")
}

/// How an answer lookup proceeds.
pub enum Dispatch {
    /// Known immediately; no request was made.
    Ready(AnswerOutcome),
    /// A request is on its way. Dropping the future abandons it.
    InFlight(BoxFuture<'static, AnswerOutcome>),
}

/// Anything that can answer a free-form question.
pub trait AnswerSource: Send + Sync {
    fn fetch_answer(&self, query: &str) -> Dispatch;
}

/// The generative-language fallback. Without a usable key every lookup resolves to
/// [`AnswerOutcome::SetupRequired`] and nothing touches the network.
#[derive(Clone)]
pub struct AnswerClient {
    gemini: Option<GeminiClient>,
}

impl AnswerClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self, GeminiClientError> {
        match GeminiClient::new(config) {
            Ok(gemini) => Ok(Self {
                gemini: Some(gemini),
            }),
            Err(GeminiClientError::MissingApiKey) => {
                warn!("GEMINI_API_KEY missing or placeholder, generated answers disabled");
                Ok(Self { gemini: None })
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.gemini.is_some()
    }
}

impl AnswerSource for AnswerClient {
    fn fetch_answer(&self, query: &str) -> Dispatch {
        let Some(gemini) = self.gemini.clone() else {
            return Dispatch::Ready(AnswerOutcome::SetupRequired);
        };
        let request = GenerateContentRequest::from_prompt(support_prompt(query));
        let query = query.to_string();

        Dispatch::InFlight(
            async move {
                match gemini.generate_content(&request).await {
                    Ok(response) => outcome_from_response(response),
                    Err(e) => {
                        warn!(error = %e, query = %query, "answer request failed");
                        AnswerOutcome::Failed(e.to_string())
                    }
                }
            }
            .boxed(),
        )
    }
}

pub fn outcome_from_response(response: GenerateContentResponse) -> AnswerOutcome {
    if let Some(text) = response.first_text() {
        return AnswerOutcome::Answer(text.to_string());
    }
    debug!(
        candidates = response.candidates.len(),
        feedback = response.prompt_feedback.is_some(),
        "answer response carried no candidate text"
    );
    AnswerOutcome::NoAnswer {
        feedback: response.prompt_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/models/test-model:generateContent";

    fn client_for(server: &MockServer, key: &str) -> AnswerClient {
        AnswerClient::new(GeminiClientConfig {
            api_key: Some(key.to_string()),
            base_url: server.uri(),
            model: "test-model".to_string(),
            ..GeminiClientConfig::default()
        })
        .expect("client")
    }

    async fn resolve(dispatch: Dispatch) -> AnswerOutcome {
        match dispatch {
            Dispatch::Ready(outcome) => outcome,
            Dispatch::InFlight(fut) => fut.await,
        }
    }

    #[tokio::test]
    async fn placeholder_key_short_circuits_without_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for key in ["GEMINI_API_KEY_PLACEHOLDER", "YOUR_API_KEY_HERE", ""] {
            let client = client_for(&server, key);
            assert!(!client.is_configured());
            match client.fetch_answer("How do I pay?") {
                Dispatch::Ready(outcome) => assert_eq!(outcome, AnswerOutcome::SetupRequired),
                Dispatch::InFlight(_) => panic!("no request should be started for {key:?}"),
            }
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn first_candidate_text_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(query_param("key", "live-key"))
            .and(body_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": support_prompt("Do you take PayPal?") }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "We accept Visa and PayPal." }] } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "live-key");
        let outcome = resolve(client.fetch_answer("Do you take PayPal?")).await;
        assert_eq!(
            outcome,
            AnswerOutcome::Answer("We accept Visa and PayPal.".to_string())
        );
    }

    #[tokio::test]
    async fn response_without_candidates_is_no_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "live-key");
        let outcome = resolve(client.fetch_answer("something blocked")).await;
        assert_eq!(
            outcome,
            AnswerOutcome::NoAnswer {
                feedback: Some(serde_json::json!({ "blockReason": "SAFETY" }))
            }
        );
    }

    #[tokio::test]
    async fn upstream_failure_becomes_failed_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": { "code": 403, "message": "Permission denied." }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "live-key");
        let outcome = resolve(client.fetch_answer("anything")).await;
        assert_eq!(outcome, AnswerOutcome::Failed("Permission denied.".to_string()));
    }

    #[tokio::test]
    async fn unreachable_service_becomes_failed_outcome() {
        let client = AnswerClient::new(GeminiClientConfig {
            api_key: Some("live-key".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            ..GeminiClientConfig::default()
        })
        .expect("client");

        match resolve(client.fetch_answer("anything")).await {
            AnswerOutcome::Failed(message) => assert!(message.starts_with("request failed")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn prompt_embeds_raw_query() {
        assert_eq!(
            support_prompt("Can I Pay Monthly?"),
            "You are a helpful customer support assistant for a generic tech company. \
Answer this question concisely (max 2-3 sentences): Can I Pay Monthly?"
        );
    }
}
