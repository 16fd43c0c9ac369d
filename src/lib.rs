pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::TomlConfig;

pub use adapters::catalog::TarotCatalog;
pub use core::draw::{CardSelection, DrawEngine, DrawRequest};
pub use core::engine::{Reading, ReadingEngine, ReadingRequest, ReadingSource};
pub use domain::model::{BirthInfo, Chart, Gender, Pillar, SajuAnalysis};
pub use domain::tarot::{DrawnCard, SpreadType};
pub use utils::error::{Result, SajuError};
