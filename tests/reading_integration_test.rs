use httpmock::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saju_tarot::domain::ports::HourConvention;
use saju_tarot::utils::validation::Validate;
use saju_tarot::{
    BirthInfo, DrawRequest, Gender, ReadingEngine, ReadingRequest, ReadingSource, SajuError,
    SpreadType, TomlConfig,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn config_with_ai(endpoint: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[engine]
reversal_probability = 0.0

[ai]
endpoint = "{}"
model = "mock-reader"
api_key = "test-key"
timeout_seconds = 5
"#,
        endpoint
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

fn request(spread: SpreadType) -> ReadingRequest {
    ReadingRequest {
        birth: BirthInfo::solar(1992, 4, 21, Gender::Female).with_hour(14),
        draw: DrawRequest::random(spread),
        question: Some("How will this season go?".to_string()),
    }
}

#[tokio::test]
async fn test_end_to_end_reading_with_mock_interpreter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("mock-reader")
                .body_contains("How will this season go?");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "Water meets fire."}}]
                }));
        })
        .await;

    let config = config_with_ai(&server.base_url());
    config.validate().unwrap();
    let engine = ReadingEngine::from_config(&config).unwrap();
    assert!(engine.has_interpreter());

    let mut rng = StdRng::seed_from_u64(1);
    let reading = engine
        .read_with_rng(&request(SpreadType::SajuCustom), &mut rng)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(reading.text(), "Water meets fire.");
    assert_eq!(
        reading.source,
        ReadingSource::Interpreter {
            name: "mock-reader".to_string()
        }
    );
    assert_eq!(reading.cards.len(), 5);
    assert!(reading.cards.iter().all(|c| !c.is_reversed));
    assert!(reading.analysis.chart.hour.is_some());
}

#[tokio::test]
async fn test_interpreter_outage_falls_back_to_composer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(503).body("unavailable");
        })
        .await;

    let engine = ReadingEngine::from_config(&config_with_ai(&server.base_url())).unwrap();
    let reading = engine.read(&request(SpreadType::YesNo)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reading.source, ReadingSource::Composer);
    assert!(reading.interpretation.is_none());
    assert!(reading.text().contains("[Advice]"));
    // 逆位機率為 0，答案必為 yes
    assert_eq!(
        reading.verdict,
        Some(saju_tarot::core::composer::Verdict::Yes)
    );
}

#[tokio::test]
async fn test_config_files_drive_catalog_and_lunar_table() {
    let dir = TempDir::new().unwrap();

    let embedded = saju_tarot::TarotCatalog::embedded().unwrap();
    let mut cards = embedded.cards().to_vec();
    cards[0].name = "The Wanderer".to_string();
    let catalog_path = write_file(&dir, "cards.json", &serde_json::to_string(&cards).unwrap());

    let lunar_path = write_file(
        &dir,
        "lunar.json",
        r#"[{"year": 1992, "new_year": "1992-02-04",
            "month_days": [29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30]}]"#,
    );

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[engine]
hour_convention = "half-hour-offset"

[catalog]
path = "{}"

[lunar]
table_path = "{}"
"#,
        catalog_path, lunar_path
    )
    .unwrap();

    let config = TomlConfig::from_file(config_file.path()).unwrap();
    config.validate().unwrap();
    let engine = ReadingEngine::from_config(&config).unwrap();

    assert!(!engine.has_interpreter());
    assert_eq!(engine.hour_convention(), HourConvention::HalfHourOffset);
    assert_eq!(engine.catalog().card(0).unwrap().name, "The Wanderer");

    // 三月初一 = 2 月 4 日 + 29 + 30 天
    let lunar = BirthInfo::solar(1992, 3, 1, Gender::Male).lunar(false);
    let analysis = engine.analyze(&lunar).unwrap();
    assert_eq!(
        analysis.solar_date,
        chrono::NaiveDate::from_ymd_opt(1992, 4, 3).unwrap()
    );

    let outside = BirthInfo::solar(1993, 3, 1, Gender::Male).lunar(false);
    assert!(matches!(
        engine.analyze(&outside),
        Err(SajuError::LunarConversion { .. })
    ));
}

#[test]
fn test_broken_catalog_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cards.json", "[]");
    let config = TomlConfig::from_toml_str(&format!("[catalog]\npath = \"{}\"\n", path)).unwrap();

    let err = ReadingEngine::from_config(&config).err().unwrap();
    assert!(matches!(err, SajuError::Catalog { .. }));
    assert_eq!(
        err.severity(),
        saju_tarot::utils::error::ErrorSeverity::Critical
    );
}
