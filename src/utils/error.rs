use thiserror::Error;

#[derive(Error, Debug)]
pub enum SajuError {
    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid calendar date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Unknown spread type: {0}")]
    UnknownSpread(String),

    #[error("Card index {index} is out of range (deck has {deck_size} cards)")]
    InvalidCardIndex { index: usize, deck_size: usize },

    #[error("Spread '{spread}' needs {expected} card indices, got {actual}")]
    CardCountMismatch {
        spread: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown {kind} symbol: {symbol}")]
    UnknownSymbol { kind: &'static str, symbol: String },

    #[error("Tarot catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Lunar conversion failed: {message}")]
    LunarConversion { message: String },

    #[error("Interpreter request failed: {0}")]
    Interpreter(#[from] reqwest::Error),

    #[error("Interpreter returned an unusable response: {message}")]
    InterpreterResponse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Conversion,
    External,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SajuError {
    pub fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        SajuError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SajuError::InvalidValue { .. }
            | SajuError::InvalidDate { .. }
            | SajuError::UnknownSpread(_)
            | SajuError::InvalidCardIndex { .. }
            | SajuError::CardCountMismatch { .. } => ErrorCategory::Validation,
            SajuError::UnknownSymbol { .. }
            | SajuError::Catalog { .. }
            | SajuError::Config { .. }
            | SajuError::Toml(_) => ErrorCategory::Configuration,
            SajuError::LunarConversion { .. } => ErrorCategory::Conversion,
            SajuError::Interpreter(_) | SajuError::InterpreterResponse { .. } => {
                ErrorCategory::External
            }
            SajuError::Io(_) | SajuError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Conversion => ErrorSeverity::High,
            // 外部服務錯誤可以重試，或退回模板解讀
            ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SajuError::InvalidValue { .. } => {
                "Check the birth data: month 1-12, day 1-31, hour 0-23, minute 0-59"
            }
            SajuError::InvalidDate { .. } => "The date does not exist in the Gregorian calendar",
            SajuError::UnknownSpread(_) => "Run the `spreads` command to list supported spread types",
            SajuError::InvalidCardIndex { .. } => "Card indices must be between 0 and 77",
            SajuError::CardCountMismatch { .. } => {
                "Pass exactly one index per spread position (plus one for the advice card)"
            }
            SajuError::UnknownSymbol { .. } => "Use hanja, hangul or romanized stem/branch names",
            SajuError::Catalog { .. } => "Verify the tarot catalog file contains all 78 cards",
            SajuError::Config { .. } | SajuError::Toml(_) => {
                "Check the TOML configuration file for typos and missing sections"
            }
            SajuError::LunarConversion { .. } => {
                "Make sure the lunar table covers the birth year and the leap-month flag is correct"
            }
            SajuError::Interpreter(_) | SajuError::InterpreterResponse { .. } => {
                "Verify the AI endpoint and API key, or run without AI to use the template reading"
            }
            SajuError::Io(_) => "Check file paths and permissions",
            SajuError::Serialization(_) => "The data file is not valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Conversion => format!("Could not convert the lunar date: {}", self),
            ErrorCategory::External => format!("AI interpreter unavailable: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SajuError>;
