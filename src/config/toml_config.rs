use crate::core::draw::DEFAULT_REVERSAL_PROBABILITY;
use crate::domain::ports::{AiSettings, ConfigProvider, HourConvention};
use crate::utils::error::{Result, SajuError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lunar: LunarConfig,
    #[serde(default)]
    pub ai: Option<AiSettings>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub hour_convention: HourConvention,
    #[serde(default = "default_reversal_probability")]
    pub reversal_probability: f64,
}

fn default_reversal_probability() -> f64 {
    DEFAULT_REVERSAL_PROBABILITY
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hour_convention: HourConvention::default(),
            reversal_probability: DEFAULT_REVERSAL_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 未設定時使用內建牌組
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarConfig {
    pub table_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    pub level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SAJU_AI_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SajuError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_range(
            "engine.reversal_probability",
            self.engine.reversal_probability,
            0.0,
            1.0,
        )?;

        if let Some(path) = &self.catalog.path {
            validate_path("catalog.path", path)?;
        }
        if let Some(path) = &self.lunar.table_path {
            validate_path("lunar.table_path", path)?;
        }

        if let Some(ai) = &self.ai {
            validate_non_empty_string("ai.provider", &ai.provider)?;
            validate_url("ai.endpoint", &ai.endpoint)?;
            validate_non_empty_string("ai.model", &ai.model)?;
            validate_range("ai.timeout_seconds", ai.timeout_seconds, 1, 600)?;
            validate_range("ai.max_tokens", ai.max_tokens, 1, 32_768)?;
        }

        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(SajuError::invalid_value(
                    "logging.level",
                    level,
                    format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                ));
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn hour_convention(&self) -> HourConvention {
        self.engine.hour_convention
    }

    fn reversal_probability(&self) -> f64 {
        self.engine.reversal_probability
    }

    fn catalog_path(&self) -> Option<&str> {
        self.catalog.path.as_deref()
    }

    fn lunar_table_path(&self) -> Option<&str> {
        self.lunar.table_path.as_deref()
    }

    fn ai_settings(&self) -> Option<&AiSettings> {
        self.ai.as_ref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[engine]
hour_convention = "half-hour-offset"
reversal_probability = 0.25

[catalog]
path = "./data/tarot_cards.json"

[lunar]
table_path = "./data/lunar.json"

[ai]
provider = "openai"
endpoint = "https://api.example.com/v1"
model = "reader-1"
timeout_seconds = 10

[logging]
json = true
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.hour_convention(), HourConvention::HalfHourOffset);
        assert_eq!(config.reversal_probability(), 0.25);
        assert_eq!(config.catalog_path(), Some("./data/tarot_cards.json"));
        assert_eq!(config.lunar_table_path(), Some("./data/lunar.json"));
        let ai = config.ai_settings().unwrap();
        assert_eq!(ai.model, "reader-1");
        assert_eq!(ai.max_tokens, 1024);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.hour_convention(), HourConvention::Standard);
        assert_eq!(config.reversal_probability(), 0.3);
        assert!(config.ai_settings().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SAJU_TEST_AI_KEY", "sk-test");

        let toml_content = r#"
[ai]
api_key = "${SAJU_TEST_AI_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.ai.unwrap().api_key.as_deref(), Some("sk-test"));

        std::env::remove_var("SAJU_TEST_AI_KEY");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[ai]
api_key = "${SAJU_TEST_UNSET_VARIABLE}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.ai.unwrap().api_key.as_deref(),
            Some("${SAJU_TEST_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_config_validation() {
        let bad_probability = TomlConfig::from_toml_str("[engine]\nreversal_probability = 1.5\n").unwrap();
        assert!(bad_probability.validate().is_err());

        let bad_endpoint = TomlConfig::from_toml_str("[ai]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_level = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_unknown_hour_convention_is_toml_error() {
        let result = TomlConfig::from_toml_str("[engine]\nhour_convention = \"sundial\"\n");
        assert!(matches!(result, Err(SajuError::Toml(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[engine]
reversal_probability = 0.5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.reversal_probability(), 0.5);
    }
}
