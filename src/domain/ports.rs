use crate::domain::model::SajuAnalysis;
use crate::domain::tarot::{DrawnCard, SpreadType};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resolves a lunar birth date to the Gregorian calendar.
pub trait LunarConverter: Send + Sync {
    fn to_solar(&self, year: i32, month: u32, day: u32, is_leap_month: bool) -> Result<NaiveDate>;
}

/// Structured inputs handed to a prose-generating collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationRequest {
    pub spread: SpreadType,
    pub question: Option<String>,
    pub analysis: SajuAnalysis,
    pub cards: Vec<DrawnCard>,
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    fn name(&self) -> &str;
    async fn interpret(&self, request: &InterpretationRequest) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HourConvention {
    /// Slot boundaries on odd whole hours; slot 0 is 23:00-00:59.
    #[default]
    Standard,
    /// Boundaries shifted by 30 minutes; slot 0 is 23:30-01:29.
    HalfHourOffset,
}

pub const DEFAULT_AI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// Settings for an OpenAI-compatible chat-completions interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_AI_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_AI_MODEL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            max_tokens: default_max_tokens(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn hour_convention(&self) -> HourConvention;
    fn reversal_probability(&self) -> f64;
    fn catalog_path(&self) -> Option<&str>;
    fn lunar_table_path(&self) -> Option<&str>;
    fn ai_settings(&self) -> Option<&AiSettings>;
}
