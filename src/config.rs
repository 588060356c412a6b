use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub output_directory: PathBuf,
    pub llm: LLMConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LLMProvider {
    OpenAI,
    Ollama,
    Anthropic,
}

impl LLMProvider {
    /// Whether calls can go out without an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }

    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            LLMProvider::OpenAI => Some("OPENAI_API_KEY"),
            LLMProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LLMProvider::Ollama => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Browserless endpoint used to render JavaScript-heavy pages. Plain HTTP when unset.
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    /// CSS selector that must be present in the loaded markup. Empty disables the check.
    pub wait_for: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Scroll the rendered page to the bottom before capture so lazy content loads.
    #[serde(default = "scroll_by_default")]
    pub scroll_for_lazy_content: bool,
}

fn scroll_by_default() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            browserless_url: None,
            browserless_token: None,
            wait_for: "h1".to_string(),
            timeout_seconds: 30,
            user_agent: format!("cro-auditor/{}", env!("CARGO_PKG_VERSION")),
            scroll_for_lazy_content: true,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            timeout_seconds: 120,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("audits"),
            llm: LLMConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path (~/.cro-auditor.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".cro-auditor.toml"))
    }

    /// Load config from the default location, falling back to defaults if the file doesn't exist
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            println!("📝 Loading configuration from: {}", config_path.display());
            Self::from_file(&config_path)?
        } else {
            println!("ℹ️  No config file found at {}, using defaults", config_path.display());
            println!("💡 Run 'cro-auditor config' to create a default configuration file");
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file path
    pub fn from_file(path: &PathBuf) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Fill unset credentials and endpoints from the environment.
    pub fn apply_env(&mut self) {
        self.llm.api_key = self.llm.api_key.take().filter(|key| !key.trim().is_empty());
        if self.llm.api_key.is_none() {
            self.llm.api_key = self
                .llm
                .provider
                .api_key_env_var()
                .and_then(|var| env::var(var).ok())
                .filter(|key| !key.trim().is_empty());
        }

        if self.loader.browserless_url.is_none() {
            self.loader.browserless_url = env::var("BROWSERLESS_URL").ok();
        }
        if self.loader.browserless_token.is_none() {
            self.loader.browserless_token = env::var("BROWSERLESS_TOKEN").ok();
        }
    }

    /// Save config to a file
    pub fn to_file(&self, path: &PathBuf) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# CRO Auditor Configuration File
# This file configures how cro-auditor loads pages and grades them

# Directory where Markdown, HTML and JSON reports are written
output_directory = "audits"

[llm]
# LLM Provider: "OpenAI", "Ollama", or "Anthropic"
provider = "OpenAI"

# API key for the provider (can also be set via environment variables)
# OpenAI: OPENAI_API_KEY
# Anthropic: ANTHROPIC_API_KEY
# Without a key every checklist item is reported as "API not available".
# api_key = "your-api-key-here"

# Base URL (OpenAI-compatible gateways or local Ollama instances)
# base_url = "http://localhost:11434"

# Model to use
model = "gpt-4o-mini"

# Maximum tokens for each LLM response
max_tokens = 1500

# Temperature for LLM responses
temperature = 0.7

# Request timeout in seconds
timeout_seconds = 120

[loader]
# Browserless endpoint for rendering JavaScript-heavy pages (or BROWSERLESS_URL)
# browserless_url = "http://localhost:3000"
# browserless_token = "your-token"

# Selector that must appear on the page before it is audited ("" disables the check)
wait_for = "h1"

# Page load timeout in seconds
timeout_seconds = 30

# User agent for direct HTTP fetches
user_agent = "cro-auditor"

# Scroll rendered pages top to bottom before capture so lazy-loaded
# testimonials, images and embeds are present (Browserless only)
scroll_for_lazy_content = true
"#
        .to_string()
    }
}
