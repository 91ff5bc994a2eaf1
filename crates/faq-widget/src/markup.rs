use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::AnswerOutcome;

pub const NO_ANSWER_MESSAGE: &str = "I couldn't find an answer to that question.";
pub const FAILURE_PREFIX: &str = "Sorry, something went wrong: ";
pub const SETUP_REQUIRED_HTML: &str = "<div class=\"answer-setup\"><strong>Setup Required:</strong> \
set the <code>GEMINI_API_KEY</code> environment variable to enable generated answers.</div>";

const ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "code", "pre", "p", "br", "ul", "ol", "li",
];

// Attribute-free tags only; anything with attributes never matches and gets escaped.
static BARE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)\s*/?>").expect("valid regex"));

/// How much of the external answer's markup reaches the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupPolicy {
    /// Everything is text.
    #[default]
    Escape,
    /// A small set of attribute-free formatting tags passes through; the rest is text.
    Basic,
}

impl FromStr for MarkupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "escape" => Ok(Self::Escape),
            "basic" => Ok(Self::Basic),
            other => Err(format!("unknown markup policy {other:?} (expected \"escape\" or \"basic\")")),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make untrusted answer text safe to insert as markup under `policy`.
pub fn sanitize(text: &str, policy: MarkupPolicy) -> String {
    match policy {
        MarkupPolicy::Escape => escape_html(text),
        MarkupPolicy::Basic => {
            let mut out = String::with_capacity(text.len());
            let mut last = 0;
            for caps in BARE_TAG.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                out.push_str(&escape_html(&text[last..whole.start()]));
                let name = caps[2].to_ascii_lowercase();
                if ALLOWED_TAGS.contains(&name.as_str()) {
                    let closing = if &caps[1] == "/" && name != "br" { "/" } else { "" };
                    out.push('<');
                    out.push_str(closing);
                    out.push_str(&name);
                    out.push('>');
                } else {
                    out.push_str(&escape_html(whole.as_str()));
                }
                last = whole.end();
            }
            out.push_str(&escape_html(&text[last..]));
            out
        }
    }
}

/// Markup for the answer region.
pub fn render_outcome(outcome: &AnswerOutcome, policy: MarkupPolicy) -> String {
    match outcome {
        AnswerOutcome::SetupRequired => SETUP_REQUIRED_HTML.to_string(),
        AnswerOutcome::Answer(text) => sanitize(text, policy),
        AnswerOutcome::NoAnswer { feedback } => {
            let mut message = NO_ANSWER_MESSAGE.to_string();
            if let Some(feedback) = feedback {
                message.push_str(&format!(" (Feedback: {feedback})"));
            }
            escape_html(&message)
        }
        AnswerOutcome::Failed(error) => format!(
            "<div class=\"answer-error\">{}</div>",
            escape_html(&format!("{FAILURE_PREFIX}{error}"))
        ),
    }
}
