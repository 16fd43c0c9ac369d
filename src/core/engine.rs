use crate::adapters::ai::select_interpreter;
use crate::adapters::catalog::TarotCatalog;
use crate::adapters::lunar::TableLunarConverter;
use crate::core::classifier::analyze_chart;
use crate::core::composer::{compose, yes_no_verdict, ComposedReading, Verdict};
use crate::core::draw::{DrawEngine, DrawRequest};
use crate::core::pillars::compute_chart;
use crate::domain::model::{BirthInfo, SajuAnalysis};
use crate::domain::ports::{
    ConfigProvider, HourConvention, InterpretationRequest, Interpreter, LunarConverter,
};
use crate::domain::tarot::{DrawnCard, SpreadType};
use crate::utils::error::{Result, SajuError};
use crate::utils::validation::validate_birth_info;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRequest {
    pub birth: BirthInfo,
    pub draw: DrawRequest,
    #[serde(default)]
    pub question: Option<String>,
}

impl ReadingRequest {
    /// Checks birth data and card selection together, before any computation.
    pub fn validate(&self) -> Result<()> {
        validate_birth_info(&self.birth)?;
        self.draw.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReadingSource {
    Composer,
    Interpreter { name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub spread: SpreadType,
    pub question: Option<String>,
    pub analysis: SajuAnalysis,
    pub cards: Vec<DrawnCard>,
    pub composed: ComposedReading,
    /// Prose from the interpreter, when one answered.
    pub interpretation: Option<String>,
    pub source: ReadingSource,
    pub verdict: Option<Verdict>,
}

impl Reading {
    /// Interpreter prose if present, otherwise the composed text.
    pub fn text(&self) -> String {
        self.interpretation
            .clone()
            .unwrap_or_else(|| self.composed.to_text())
    }
}

/// Ties analysis, draw and interpretation together; cheap to share across tasks.
pub struct ReadingEngine {
    hour_convention: HourConvention,
    catalog: Arc<TarotCatalog>,
    draw_engine: DrawEngine,
    lunar: Option<Arc<dyn LunarConverter>>,
    interpreter: Option<Arc<dyn Interpreter>>,
}

impl ReadingEngine {
    pub fn new(catalog: Arc<TarotCatalog>) -> Self {
        Self {
            hour_convention: HourConvention::default(),
            draw_engine: DrawEngine::new(catalog.clone()),
            catalog,
            lunar: None,
            interpreter: None,
        }
    }

    /// Loads the catalog, lunar table and interpreter named by the configuration.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let catalog = match config.catalog_path() {
            Some(path) => TarotCatalog::from_file(path)?,
            None => TarotCatalog::embedded()?,
        };
        tracing::debug!("Tarot catalog ready ({} cards)", catalog.len());

        let mut engine = Self::new(Arc::new(catalog))
            .with_hour_convention(config.hour_convention())
            .with_reversal_probability(config.reversal_probability());

        if let Some(path) = config.lunar_table_path() {
            engine = engine.with_lunar_converter(Arc::new(TableLunarConverter::from_file(path)?));
        }
        if let Some(interpreter) = select_interpreter(config.ai_settings())? {
            engine = engine.with_interpreter(interpreter);
        }

        Ok(engine)
    }

    pub fn with_hour_convention(mut self, convention: HourConvention) -> Self {
        self.hour_convention = convention;
        self
    }

    pub fn with_reversal_probability(mut self, probability: f64) -> Self {
        self.draw_engine = self.draw_engine.with_reversal_probability(probability);
        self
    }

    pub fn with_lunar_converter(mut self, converter: Arc<dyn LunarConverter>) -> Self {
        self.lunar = Some(converter);
        self
    }

    pub fn with_interpreter(mut self, interpreter: Arc<dyn Interpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn catalog(&self) -> &TarotCatalog {
        &self.catalog
    }

    pub fn hour_convention(&self) -> HourConvention {
        self.hour_convention
    }

    pub fn has_interpreter(&self) -> bool {
        self.interpreter.is_some()
    }

    fn resolve_solar_date(&self, birth: &BirthInfo) -> Result<NaiveDate> {
        if birth.is_lunar {
            let converter = self.lunar.as_ref().ok_or_else(|| SajuError::LunarConversion {
                message: "no lunar conversion table is configured".to_string(),
            })?;
            let is_leap = birth.is_leap_month.unwrap_or(false);
            return converter.to_solar(birth.year, birth.month, birth.day, is_leap);
        }

        NaiveDate::from_ymd_opt(birth.year, birth.month, birth.day).ok_or(SajuError::InvalidDate {
            year: birth.year,
            month: birth.month,
            day: birth.day,
        })
    }

    /// Validates the birth record, resolves lunar input and builds the analysis.
    pub fn analyze(&self, birth: &BirthInfo) -> Result<SajuAnalysis> {
        validate_birth_info(birth)?;
        let solar_date = self.resolve_solar_date(birth)?;

        let time = birth.hour.map(|hour| (hour, birth.minute.unwrap_or(0)));
        let chart = compute_chart(solar_date, time, self.hour_convention);
        let analysis = analyze_chart(birth.clone(), solar_date, chart);

        tracing::debug!(
            "Analysis for {}: day master {} ({}), {} sal",
            solar_date,
            analysis.day_master.stem,
            analysis.day_master.element,
            analysis.sals.len()
        );
        Ok(analysis)
    }

    pub fn draw<R: Rng>(&self, request: &DrawRequest, rng: &mut R) -> Result<Vec<DrawnCard>> {
        self.draw_engine.draw(request, rng)
    }

    /// Draws with a fresh thread-local generator.
    pub fn draw_random(&self, request: &DrawRequest) -> Result<Vec<DrawnCard>> {
        let mut rng = rand::thread_rng();
        self.draw_engine.draw(request, &mut rng)
    }

    pub async fn read(&self, request: &ReadingRequest) -> Result<Reading> {
        tracing::info!("🚀 Starting {} reading", request.draw.spread);
        request.validate()?;
        let analysis = self.analyze(&request.birth)?;
        let cards = self.draw_random(&request.draw)?;
        Ok(self.finish(request, analysis, cards).await)
    }

    /// Same as [`ReadingEngine::read`] with a caller-supplied generator.
    pub async fn read_with_rng<R: Rng>(&self, request: &ReadingRequest, rng: &mut R) -> Result<Reading> {
        tracing::info!("🚀 Starting {} reading", request.draw.spread);
        request.validate()?;
        let analysis = self.analyze(&request.birth)?;
        let cards = self.draw(&request.draw, rng)?;
        Ok(self.finish(request, analysis, cards).await)
    }

    async fn finish(&self, request: &ReadingRequest, analysis: SajuAnalysis, cards: Vec<DrawnCard>) -> Reading {
        let composed = compose(&analysis, &cards);
        let verdict = match request.draw.spread {
            SpreadType::YesNo => yes_no_verdict(&cards),
            _ => None,
        };

        let mut interpretation = None;
        let mut source = ReadingSource::Composer;
        if let Some(interpreter) = &self.interpreter {
            let interpretation_request = InterpretationRequest {
                spread: request.draw.spread,
                question: request.question.clone(),
                analysis: analysis.clone(),
                cards: cards.clone(),
            };
            match interpreter.interpret(&interpretation_request).await {
                Ok(text) => {
                    interpretation = Some(text);
                    source = ReadingSource::Interpreter {
                        name: interpreter.name().to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Interpreter {} failed, falling back to composed reading: {}",
                        interpreter.name(),
                        e
                    );
                }
            }
        }

        tracing::info!("✅ Reading complete ({} cards)", cards.len());
        Reading {
            spread: request.draw.spread,
            question: request.question.clone(),
            analysis,
            cards,
            composed,
            interpretation,
            source,
            verdict,
        }
    }
}
