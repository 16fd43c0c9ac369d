use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saju_tarot::config::cli::{Cli, Command, OutputFormat};
use saju_tarot::utils::error::ErrorSeverity;
use saju_tarot::utils::{logger, validation::Validate};
use saju_tarot::{
    DrawnCard, Reading, ReadingEngine, ReadingRequest, SajuAnalysis, SajuError, SpreadType,
    TomlConfig,
};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 載入配置，日誌設定可能來自檔案
    let loaded = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(TomlConfig::default()),
    };

    let (json_logs, level) = match &loaded {
        Ok(config) => (cli.json_logs || config.logging.json, config.logging.level.clone()),
        Err(_) => (cli.json_logs, None),
    };
    if json_logs {
        logger::init_json_logger(cli.verbose, level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, level.as_deref());
    }

    tracing::info!("Starting saju-tarot CLI");

    let result = match loaded {
        Ok(config) => run(&cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(err) = result {
        std::process::exit(report(&err));
    }
}

async fn run(cli: &Cli, mut config: TomlConfig) -> anyhow::Result<()> {
    cli.overrides.apply(&mut config);
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    // 驗證配置
    config.validate()?;

    match &cli.command {
        Command::Spreads => print_spreads(cli.format)?,
        Command::Analyze(birth) => {
            let engine = build_engine(&config)?;
            let analysis = engine.analyze(&birth.to_birth_info())?;
            match cli.format {
                OutputFormat::Json => print_json(&analysis)?,
                OutputFormat::Text => println!("{}", render_analysis(&analysis)),
            }
        }
        Command::Draw(draw) => {
            let engine = build_engine(&config)?;
            let request = draw.to_request();
            let cards = match draw.seed {
                Some(seed) => engine.draw(&request, &mut StdRng::seed_from_u64(seed))?,
                None => engine.draw_random(&request)?,
            };
            match cli.format {
                OutputFormat::Json => print_json(&cards)?,
                OutputFormat::Text => println!("{}", render_cards(&cards)),
            }
        }
        Command::Read { birth, draw, question } => {
            let engine = build_engine(&config)?;
            let request = ReadingRequest {
                birth: birth.to_birth_info(),
                draw: draw.to_request(),
                question: question.clone(),
            };
            let reading = match draw.seed {
                Some(seed) => {
                    engine
                        .read_with_rng(&request, &mut StdRng::seed_from_u64(seed))
                        .await?
                }
                None => engine.read(&request).await?,
            };
            match cli.format {
                OutputFormat::Json => print_json(&reading)?,
                OutputFormat::Text => println!("{}", render_reading(&reading)),
            }
        }
    }

    Ok(())
}

fn build_engine(config: &TomlConfig) -> anyhow::Result<ReadingEngine> {
    let engine = ReadingEngine::from_config(config)?;
    tracing::info!(
        "✅ Engine ready ({} cards, {:?} hours, interpreter: {})",
        engine.catalog().len(),
        engine.hour_convention(),
        if engine.has_interpreter() { "on" } else { "off" }
    );
    Ok(engine)
}

/// Logs the failure and returns the exit code for its severity.
fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SajuError>() {
        Some(e) => {
            tracing::error!(
                "❌ {:#} (Category: {:?}, Severity: {:?})",
                err,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
        None => {
            tracing::error!("❌ {:#}", err);
            eprintln!("❌ {:#}", err);
            1
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_spreads(format: OutputFormat) -> anyhow::Result<()> {
    let layouts: Vec<_> = SpreadType::ALL.iter().map(|s| s.layout()).collect();
    match format {
        OutputFormat::Json => print_json(&layouts)?,
        OutputFormat::Text => {
            for layout in layouts {
                println!(
                    "{:<18} {:>2} cards  {}",
                    layout.spread.id(),
                    layout.card_count(),
                    layout.positions.join(" / ")
                );
            }
        }
    }
    Ok(())
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_analysis(analysis: &SajuAnalysis) -> String {
    let mut lines = vec![format!("Solar date: {}", analysis.solar_date)];

    for (position, pillar) in analysis.chart.pillars() {
        lines.push(format!(
            "{:<6} {} ({}, {})",
            position,
            pillar,
            pillar.korean(),
            pillar.romanized()
        ));
    }
    lines.push(format!(
        "Day master: {} ({})",
        analysis.day_master.stem, analysis.day_master.element
    ));

    let shares = analysis
        .shares
        .iter()
        .map(|s| format!("{} {} ({:.1}%)", s.element, s.weight, s.percentage))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Elements: {}", shares));

    lines.push(String::new());
    lines.push(analysis.personality.clone());
    lines.push(format!("Strengths:\n{}", bullet_list(&analysis.strengths)));
    lines.push(format!("Weaknesses:\n{}", bullet_list(&analysis.weaknesses)));
    lines.push(format!("Recommendations:\n{}", bullet_list(&analysis.recommendations)));

    if !analysis.sals.is_empty() {
        let sals: Vec<String> = analysis
            .sals
            .iter()
            .map(|sal| {
                format!(
                    "{} {} [{}] at {}",
                    if sal.positive { "+" } else { "-" },
                    sal.name,
                    sal.hanja,
                    sal.locations.join(", ")
                )
            })
            .collect();
        lines.push(format!("Sal:\n{}", bullet_list(&sals)));
    }

    lines.join("\n")
}

fn render_cards(cards: &[DrawnCard]) -> String {
    cards
        .iter()
        .map(|drawn| {
            format!(
                "{}. {}: {} ({})",
                drawn.position + 1,
                drawn.position_meaning,
                drawn.card.name,
                drawn.orientation()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_reading(reading: &Reading) -> String {
    let mut sections = vec![render_analysis(&reading.analysis), render_cards(&reading.cards)];
    if let Some(verdict) = reading.verdict {
        sections.push(format!("Verdict: {:?}", verdict));
    }
    sections.push(reading.text());
    sections.join("\n\n")
}
