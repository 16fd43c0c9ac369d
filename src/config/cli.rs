use crate::config::TomlConfig;
use crate::core::draw::DrawRequest;
use crate::domain::model::{BirthInfo, Gender};
use crate::domain::ports::HourConvention;
use crate::domain::tarot::SpreadType;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "saju-tarot")]
#[command(about = "Four-pillar (saju) analysis combined with tarot readings")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: EngineOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HourConventionArg {
    Standard,
    HalfHourOffset,
}

impl From<HourConventionArg> for HourConvention {
    fn from(arg: HourConventionArg) -> Self {
        match arg {
            HourConventionArg::Standard => HourConvention::Standard,
            HourConventionArg::HalfHourOffset => HourConvention::HalfHourOffset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

/// Flags that take precedence over the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineOverrides {
    #[arg(long, global = true, value_enum)]
    pub hour_convention: Option<HourConventionArg>,

    #[arg(long, global = true)]
    pub reversal_probability: Option<f64>,

    /// Tarot catalog JSON replacing the built-in deck
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Lunar conversion table JSON
    #[arg(long, global = true)]
    pub lunar_table: Option<String>,
}

impl EngineOverrides {
    pub fn apply(&self, config: &mut TomlConfig) {
        if let Some(convention) = self.hour_convention {
            config.engine.hour_convention = convention.into();
        }
        if let Some(probability) = self.reversal_probability {
            config.engine.reversal_probability = probability;
        }
        if let Some(path) = &self.catalog {
            config.catalog.path = Some(path.clone());
        }
        if let Some(path) = &self.lunar_table {
            config.lunar.table_path = Some(path.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the four pillars, element balance and sal markers
    Analyze(BirthArgs),
    /// Draw cards for a spread without a birth chart
    Draw(DrawArgs),
    /// Full reading: analysis, draw and interpretation
    Read {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        draw: DrawArgs,
        #[arg(long)]
        question: Option<String>,
    },
    /// List supported spreads and their positions
    Spreads,
}

#[derive(Debug, Clone, Args)]
pub struct BirthArgs {
    /// Birth date as YYYY-MM-DD (lunar when --lunar is set)
    #[arg(long, value_parser = parse_date)]
    pub date: (i32, u32, u32),

    /// Birth time as HH or HH:MM
    #[arg(long, value_parser = parse_time)]
    pub time: Option<(u32, Option<u32>)>,

    #[arg(long, value_enum)]
    pub gender: GenderArg,

    #[arg(long)]
    pub lunar: bool,

    #[arg(long, requires = "lunar")]
    pub leap_month: bool,
}

impl BirthArgs {
    pub fn to_birth_info(&self) -> BirthInfo {
        let (year, month, day) = self.date;
        let mut birth = BirthInfo::solar(year, month, day, self.gender.into());
        if let Some((hour, minute)) = self.time {
            birth = birth.with_hour(hour);
            if let Some(minute) = minute {
                birth = birth.with_minute(minute);
            }
        }
        if self.lunar {
            birth = birth.lunar(self.leap_month);
        }
        birth
    }
}

#[derive(Debug, Clone, Args)]
pub struct DrawArgs {
    #[arg(long, default_value = "three-card")]
    pub spread: SpreadType,

    /// Deck indices (0-77) in position order; random when omitted
    #[arg(long, value_delimiter = ',')]
    pub cards: Vec<usize>,

    /// Append an advice card after the spread
    #[arg(long)]
    pub advice: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
}

impl DrawArgs {
    pub fn to_request(&self) -> DrawRequest {
        let request = if self.cards.is_empty() {
            DrawRequest::random(self.spread)
        } else {
            DrawRequest::explicit(self.spread, self.cards.clone())
        };
        if self.advice {
            request.with_advice_card()
        } else {
            request
        }
    }
}

/// Range checks happen later; this only splits the fields.
pub fn parse_date(value: &str) -> Result<(i32, u32, u32), String> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(format!("expected YYYY-MM-DD, got '{}'", value));
    }
    let year = parts[0]
        .parse::<i32>()
        .map_err(|e| format!("invalid year '{}': {}", parts[0], e))?;
    let month = parts[1]
        .parse::<u32>()
        .map_err(|e| format!("invalid month '{}': {}", parts[1], e))?;
    let day = parts[2]
        .parse::<u32>()
        .map_err(|e| format!("invalid day '{}': {}", parts[2], e))?;
    Ok((year, month, day))
}

pub fn parse_time(value: &str) -> Result<(u32, Option<u32>), String> {
    let mut parts = value.trim().splitn(2, ':');
    let hour = parts
        .next()
        .unwrap_or_default()
        .parse::<u32>()
        .map_err(|e| format!("invalid hour in '{}': {}", value, e))?;
    let minute = parts
        .next()
        .map(|m| m.parse::<u32>().map_err(|e| format!("invalid minute in '{}': {}", value, e)))
        .transpose()?;
    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(parse_date("1992-04-21").unwrap(), (1992, 4, 21));
        // 陰曆 30 日也要能通過
        assert_eq!(parse_date("1999-02-30").unwrap(), (1999, 2, 30));
        assert!(parse_date("1992/04/21").is_err());
        assert!(parse_date("1992-xx-21").is_err());

        assert_eq!(parse_time("14").unwrap(), (14, None));
        assert_eq!(parse_time("23:45").unwrap(), (23, Some(45)));
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_read_command_parsing() {
        let cli = Cli::try_parse_from([
            "saju-tarot",
            "--verbose",
            "read",
            "--date",
            "1992-04-21",
            "--time",
            "14:30",
            "--gender",
            "female",
            "--spread",
            "celtic-cross",
            "--advice",
            "--question",
            "What should I focus on?",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Read { birth, draw, question } => {
                let info = birth.to_birth_info();
                assert_eq!(info.hour, Some(14));
                assert_eq!(info.minute, Some(30));
                assert!(!info.is_lunar);
                let request = draw.to_request();
                assert_eq!(request.spread, SpreadType::CelticCross);
                assert_eq!(request.card_count(), 11);
                assert_eq!(question.as_deref(), Some("What should I focus on?"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_spread_is_rejected() {
        let result = Cli::try_parse_from(["saju-tarot", "draw", "--spread", "pentagram"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_leap_month_requires_lunar() {
        let result = Cli::try_parse_from([
            "saju-tarot",
            "analyze",
            "--date",
            "1992-03-19",
            "--gender",
            "male",
            "--leap-month",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = Cli::try_parse_from([
            "saju-tarot",
            "--hour-convention",
            "half-hour-offset",
            "--reversal-probability",
            "0.1",
            "spreads",
        ])
        .unwrap();

        let mut config = TomlConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.engine.hour_convention, HourConvention::HalfHourOffset);
        assert_eq!(config.engine.reversal_probability, 0.1);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_explicit_cards_build_explicit_request() {
        let cli = Cli::try_parse_from([
            "saju-tarot",
            "draw",
            "--spread",
            "problem-solution",
            "--cards",
            "77,0",
        ])
        .unwrap();
        let Command::Draw(draw) = cli.command else {
            panic!("expected draw");
        };
        assert_eq!(
            draw.to_request(),
            DrawRequest::explicit(SpreadType::ProblemSolution, vec![77, 0])
        );
    }
}
