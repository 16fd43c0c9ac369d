use crate::domain::ports::{AiSettings, InterpretationRequest, Interpreter};
use crate::utils::error::{Result, SajuError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY_ENV: &str = "SAJU_AI_API_KEY";

const SYSTEM_PROMPT: &str = "You are a reader who combines Korean saju (four pillars) with tarot. \
Relate every card to the person's day master and element balance, stay concrete, \
and close with practical advice.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Interpreter backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpInterpreter {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl HttpInterpreter {
    pub fn new(settings: &AiSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            max_tokens: settings.max_tokens,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

/// User prompt assembled from the structured analysis and cards.
pub fn build_prompt(request: &InterpretationRequest) -> String {
    let analysis = &request.analysis;
    let mut lines = Vec::new();

    if let Some(question) = request.question.as_deref().filter(|q| !q.trim().is_empty()) {
        lines.push(format!("Question: {}", question.trim()));
    }
    lines.push(format!("Spread: {}", request.spread));

    let pillars = analysis
        .chart
        .pillars()
        .into_iter()
        .map(|(position, pillar)| format!("{} {} ({})", position, pillar, pillar.romanized()))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Four pillars: {}", pillars));
    lines.push(format!(
        "Day master: {} ({})",
        analysis.day_master.stem, analysis.day_master.element
    ));

    let shares = analysis
        .shares
        .iter()
        .map(|s| format!("{} {:.1}%", s.element, s.percentage))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Element balance: {}", shares));

    let list = |elements: &[crate::domain::tables::Element]| {
        elements.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
    };
    lines.push(format!("Strong elements: {}", list(&analysis.strong_elements)));
    lines.push(format!("Weak elements: {}", list(&analysis.weak_elements)));

    if !analysis.sals.is_empty() {
        let sals = analysis.sals.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        lines.push(format!("Sal markers: {}", sals.join(", ")));
    }

    lines.push("Cards:".to_string());
    for drawn in &request.cards {
        let element = drawn
            .card
            .element
            .map(|e| e.to_string())
            .unwrap_or_else(|| "none".to_string());
        lines.push(format!(
            "- {}: {} ({}), element {}, meaning: {}",
            drawn.position_meaning,
            drawn.card.name,
            drawn.orientation(),
            element,
            drawn.card.meaning(drawn.is_reversed)
        ));
    }

    lines.join("\n")
}

#[async_trait]
impl Interpreter for HttpInterpreter {
    fn name(&self) -> &str {
        &self.model
    }

    async fn interpret(&self, request: &InterpretationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(request),
                },
            ],
            max_tokens: self.max_tokens,
        };

        tracing::debug!("Sending interpretation request to: {}", self.completions_url());
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        tracing::debug!("Interpreter response status: {}", response.status());
        if !response.status().is_success() {
            return Err(SajuError::InterpreterResponse {
                message: format!("HTTP {}", response.status()),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SajuError::InterpreterResponse {
                message: "response had no message content".to_string(),
            })
    }
}

/// Picks the interpreter once at startup; `None` means composed readings only.
pub fn select_interpreter(settings: Option<&AiSettings>) -> Result<Option<Arc<dyn Interpreter>>> {
    let Some(settings) = settings else {
        return Ok(None);
    };
    if settings.provider.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let api_key = settings
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()));

    match api_key {
        Some(key) => {
            tracing::info!("🤖 Using {} interpreter ({})", settings.provider, settings.model);
            let interpreter = HttpInterpreter::new(settings, key)?;
            Ok(Some(Arc::new(interpreter)))
        }
        None => {
            tracing::info!("💡 No AI credentials found, readings will use the built-in composer");
            Ok(None)
        }
    }
}
