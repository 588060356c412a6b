use crate::config::{LLMConfig, LLMProvider};
use crate::error::AnalysisError;
use crate::util::strip_code_blocks;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const OLLAMA_API_URL: &str = "http://localhost:11434";
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";

pub const COPYWRITER_SYSTEM_PROMPT: &str =
    "You are an expert conversion copywriter. Always return valid JSON.";

pub const MANUAL_REVIEW: &str = "Manual review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
}

/// A chat-completion endpoint that answers with a single text message.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// False when the backend lacks a credential and must not be called.
    fn is_configured(&self) -> bool;

    async fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisError>;
}

/// Structured verdict for one checklist question.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Judgment {
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: f64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestion: String,
}

impl Judgment {
    /// The degraded verdict recorded when analysis could not be performed.
    pub fn fallback(error: &AnalysisError) -> Self {
        Self {
            score: 0.0,
            issues: vec![error.to_string()],
            suggestion: MANUAL_REVIEW.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureExtraction {
    pub features: Vec<FeatureInsight>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureInsight {
    #[serde(default = "unknown")]
    pub feature: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub unique: bool,
    #[serde(default = "not_available")]
    pub pain_point: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub severity: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub frequency: f64,
    #[serde(default = "not_available")]
    pub outcome: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadlineReview {
    pub dimensions: Vec<DimensionRating>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DimensionRating {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: f64,
    #[serde(default = "not_available")]
    pub analysis: String,
    #[serde(default = "not_available")]
    pub suggestion: String,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn not_available() -> String {
    "N/A".to_string()
}

/// Models return scores as numbers, numeric strings, or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("score out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("non-numeric score '{}'", s))),
        other => Err(D::Error::custom(format!("unexpected score value {}", other))),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "yes" | "true"),
        serde_json::Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        _ => false,
    })
}

/// HTTP client for the configured LLM provider.
pub struct LLMClient {
    config: LLMConfig,
    client: Client,
}

impl LLMClient {
    pub fn new(config: LLMConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    async fn complete_with_openai(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AnalysisError::MissingCredential)?;
        let base_url = self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL);

        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ],
            "max_completion_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "response_format": { "type": "json_object" }
        });

        debug!(model = %self.config.model, prompt = %request.user, "OpenAI chat request");

        let response = self
            .client
            .post(format!("{}/chat/completions", base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let response_json = Self::read_json(response).await?;
        debug!(response = %response_json, "OpenAI chat response");

        Self::content_at(&response_json, &["choices", "0", "message", "content"])
    }

    async fn complete_with_ollama(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
        let base_url = self.config.base_url.as_deref().unwrap_or(OLLAMA_API_URL);

        let payload = serde_json::json!({
            "model": self.config.model,
            "prompt": format!("System: {}\n\nUser: {}", request.system, request.user),
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            }
        });

        debug!(model = %self.config.model, base_url, prompt = %request.user, "Ollama generate request");

        let response = self
            .client
            .post(format!("{}/api/generate", base_url.trim_end_matches('/')))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let response_json = Self::read_json(response).await?;
        debug!(response = %response_json, "Ollama generate response");

        Self::content_at(&response_json, &["response"])
    }

    async fn complete_with_anthropic(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AnalysisError::MissingCredential)?;
        let base_url = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);

        let payload = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": request.system,
            "messages": [
                { "role": "user", "content": request.user }
            ]
        });

        debug!(model = %self.config.model, prompt = %request.user, "Anthropic messages request");

        let response = self
            .client
            .post(format!("{}/messages", base_url.trim_end_matches('/')))
            .header("x-api-key", api_key)
            .header("Content-Type", "application/json")
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await?;

        let response_json = Self::read_json(response).await?;
        debug!(response = %response_json, "Anthropic messages response");

        Self::content_at(&response_json, &["content", "0", "text"])
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, AnalysisError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    fn content_at(value: &serde_json::Value, path: &[&str]) -> Result<String, AnalysisError> {
        let mut current = value;
        for key in path {
            current = match key.parse::<usize>() {
                Ok(index) => &current[index],
                Err(_) => &current[*key],
            };
        }

        match current.as_str() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            Some(_) => Err(AnalysisError::EmptyResponse),
            None => Err(AnalysisError::MalformedResponse(format!(
                "missing '{}' in provider response",
                path.join(".")
            ))),
        }
    }
}

#[async_trait]
impl ChatBackend for LLMClient {
    fn is_configured(&self) -> bool {
        !self.config.provider.requires_api_key()
            || self
                .config
                .api_key
                .as_deref()
                .map_or(false, |key| !key.trim().is_empty())
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
        match self.config.provider {
            LLMProvider::OpenAI => self.complete_with_openai(request).await,
            LLMProvider::Ollama => self.complete_with_ollama(request).await,
            LLMProvider::Anthropic => self.complete_with_anthropic(request).await,
        }
    }
}

fn missing_key_hint(provider: LLMProvider) -> String {
    match provider.api_key_env_var() {
        Some(var) => format!("API key not found. Set {} (or llm.api_key) for real analysis.", var),
        None => "API key not found. Set llm.api_key for real analysis.".to_string(),
    }
}

/// Fault-isolating front for the analysis service.
///
/// Every call returns a `Result`; nothing here panics or aborts the audit.
/// Without a credential all calls short-circuit to
/// [`AnalysisError::MissingCredential`] and never reach the network.
pub struct Analyst {
    backend: Box<dyn ChatBackend>,
    calls: AtomicUsize,
}

impl Analyst {
    pub fn new(backend: Box<dyn ChatBackend>) -> Self {
        if !backend.is_configured() {
            warn!("no API key configured; every checklist item will be reported as unavailable");
        }

        Self {
            backend,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &LLMConfig) -> crate::Result<Self> {
        let analyst = Self::new(Box::new(LLMClient::new(config.clone())?));
        if !analyst.is_available() {
            println!("⚠️  {}", missing_key_hint(config.provider));
        }
        Ok(analyst)
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_configured()
    }

    /// Number of service calls attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub async fn evaluate(
        &self,
        question: &str,
        context: &str,
        guidance: &str,
    ) -> Result<Judgment, AnalysisError> {
        let prompt = Self::judgment_prompt(question, context, guidance);
        self.request_json(COPYWRITER_SYSTEM_PROMPT, &prompt).await
    }

    /// Send one prompt and parse the reply into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<T, AnalysisError> {
        if !self.backend.is_configured() {
            return Err(AnalysisError::MissingCredential);
        }

        self.calls.fetch_add(1, Ordering::Relaxed);

        let request = ChatRequest {
            system: system.to_string(),
            user: prompt.to_string(),
        };
        let content = self.backend.complete(&request).await?;
        let parsed = serde_json::from_str(strip_code_blocks(&content))?;
        Ok(parsed)
    }

    fn judgment_prompt(question: &str, context: &str, guidance: &str) -> String {
        format!(
            r#"You are an expert conversion copywriter conducting a CRO audit.

**Question:** {question}

**Page Context:**
{context}

**Analysis Guidance:**
{guidance}

Provide your analysis as JSON:
{{
  "score": 0-3,
  "issues": ["specific issue 1", "specific issue 2"],
  "suggestion": "Concrete, actionable recommendation with example"
}}

Be harsh and specific. Provide real examples, not generic advice."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedBackend {
        configured: bool,
        reply: Result<String, String>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl CannedBackend {
        fn replying(reply: &str) -> Self {
            Self {
                configured: true,
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for CannedBackend {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(AnalysisError::Request)
        }
    }

    #[tokio::test]
    async fn evaluate_parses_fenced_json_and_counts_the_call() {
        let analyst = Analyst::new(Box::new(CannedBackend::replying(
            "```json\n{\"score\": \"2\", \"issues\": [\"Vague H1\"], \"suggestion\": \"Name the product\"}\n```",
        )));

        let judgment = analyst.evaluate("Q?", "H1: 'x'", "Score 3 if clear").await.unwrap();

        assert_eq!(judgment.score, 2.0);
        assert_eq!(judgment.issues, vec!["Vague H1"]);
        assert_eq!(judgment.suggestion, "Name the product");
        assert_eq!(analyst.calls(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_question_context_and_guidance() {
        let backend = CannedBackend::replying(r#"{"score": 1, "issues": [], "suggestion": ""}"#);
        let analyst = Analyst::new(Box::new(backend));
        analyst.evaluate("Is it clear?", "H1: 'Deploy'", "Be strict").await.unwrap();

        let prompt = Analyst::judgment_prompt("Is it clear?", "H1: 'Deploy'", "Be strict");
        assert!(prompt.contains("**Question:** Is it clear?"));
        assert!(prompt.contains("H1: 'Deploy'"));
        assert!(prompt.contains("Be strict"));
        assert!(prompt.contains("expert conversion copywriter"));
    }

    #[tokio::test]
    async fn missing_credential_short_circuits_without_counting() {
        let backend = CannedBackend {
            configured: false,
            reply: Ok("{}".to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let analyst = Analyst::new(Box::new(backend));

        let err = analyst.evaluate("Q", "C", "G").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCredential));
        assert_eq!(analyst.calls(), 0);
        assert!(!analyst.is_available());
    }

    #[tokio::test]
    async fn malformed_and_failed_calls_still_count() {
        let analyst = Analyst::new(Box::new(CannedBackend::replying("not json at all")));
        let err = analyst.evaluate("Q", "C", "G").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));

        let failing = Analyst::new(Box::new(CannedBackend {
            configured: true,
            reply: Err("connection reset".to_string()),
            seen: Mutex::new(Vec::new()),
        }));
        let err = failing.evaluate("Q", "C", "G").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(analyst.calls(), 1);
        assert_eq!(failing.calls(), 1);
    }

    fn client_config(provider: LLMProvider, api_key: Option<&str>) -> LLMConfig {
        LLMConfig {
            provider,
            api_key: api_key.map(str::to_string),
            ..LLMConfig::default()
        }
    }

    #[test]
    fn blank_api_key_leaves_client_unconfigured() {
        let blank = LLMClient::new(client_config(LLMProvider::OpenAI, Some("  "))).unwrap();
        assert!(!blank.is_configured());

        let keyed = LLMClient::new(client_config(LLMProvider::Anthropic, Some("sk-ant"))).unwrap();
        assert!(keyed.is_configured());

        let local = LLMClient::new(client_config(LLMProvider::Ollama, None)).unwrap();
        assert!(local.is_configured());
    }

    #[tokio::test]
    async fn blank_api_key_short_circuits_every_call() {
        let analyst = Analyst::from_config(&client_config(LLMProvider::OpenAI, Some(""))).unwrap();

        let err = analyst.evaluate("Q", "C", "G").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCredential));
        assert_eq!(analyst.calls(), 0);
    }

    #[test]
    fn missing_key_hint_names_the_provider_variable() {
        assert!(missing_key_hint(LLMProvider::Anthropic).contains("ANTHROPIC_API_KEY"));
        assert!(!missing_key_hint(LLMProvider::Anthropic).contains("OPENAI_API_KEY"));
        assert!(missing_key_hint(LLMProvider::OpenAI).contains("OPENAI_API_KEY"));
        assert!(missing_key_hint(LLMProvider::Ollama).contains("llm.api_key"));
    }

    #[test]
    fn fallback_judgment_carries_the_error() {
        let judgment = Judgment::fallback(&AnalysisError::MissingCredential);
        assert_eq!(judgment.score, 0.0);
        assert_eq!(judgment.issues, vec!["API not available"]);
        assert_eq!(judgment.suggestion, MANUAL_REVIEW);
    }

    #[test]
    fn composite_shapes_tolerate_loose_model_output() {
        let extraction: FeatureExtraction = serde_json::from_str(
            r#"{"features": [{"feature": "Instant rollbacks", "unique": "yes", "severity": 4, "frequency": "3"}]}"#,
        )
        .unwrap();
        let feature = &extraction.features[0];
        assert!(feature.unique);
        assert_eq!(feature.severity, 4.0);
        assert_eq!(feature.frequency, 3.0);
        assert_eq!(feature.pain_point, "N/A");

        let missing_key = serde_json::from_str::<HeadlineReview>(r#"{"ratings": []}"#);
        assert!(missing_key.is_err());
    }

    #[test]
    fn content_at_walks_provider_envelopes() {
        let openai = serde_json::json!({"choices": [{"message": {"content": "{\"score\": 3}"}}]});
        assert_eq!(
            LLMClient::content_at(&openai, &["choices", "0", "message", "content"]).unwrap(),
            "{\"score\": 3}"
        );

        let empty = serde_json::json!({"response": "  "});
        assert!(matches!(
            LLMClient::content_at(&empty, &["response"]),
            Err(AnalysisError::EmptyResponse)
        ));

        let missing = serde_json::json!({"error": "boom"});
        assert!(matches!(
            LLMClient::content_at(&missing, &["content", "0", "text"]),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }
}
