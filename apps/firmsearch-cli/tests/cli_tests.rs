use assert_cmd::Command;
use predicates::prelude::*;

fn firmsearch() -> Command {
    let mut cmd = Command::cargo_bin("firmsearch").expect("binary built");
    let scratch = std::env::temp_dir();
    cmd.current_dir(scratch)
        .env("RUST_ENV", "test")
        .env("RUST_LOG", "error")
        .env("APP_LEXICAL__BASE_URL", "http://127.0.0.1:9/solr/company")
        .env("APP_LEXICAL__TIMEOUT_MS", "300")
        .env("APP_RETRY__MAX_RETRIES", "0")
        .env("APP_USE_FAKE_EMBEDDINGS", "1");
    cmd
}

#[test]
fn parse_prints_entities_and_filters() -> anyhow::Result<()> {
    let output = firmsearch().args(["parse", "tech companies in california"]).output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["parsed"]["industries"], serde_json::json!(["technology"]));
    assert_eq!(json["parsed"]["locations"], serde_json::json!(["california"]));
    assert_eq!(json["parsed"]["cleanedQuery"], "technology");
    assert!(json["filters"]["location"].as_array().is_some_and(|v| v.iter().any(|t| t == "San Francisco")));
    Ok(())
}

#[test]
fn short_suggest_query_is_empty() {
    firmsearch()
        .args(["suggest", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"allSuggestions\": []"));
}

#[test]
fn suggest_falls_back_to_vocabulary_when_engine_is_down() -> anyhow::Result<()> {
    let output = firmsearch().args(["suggest", "cali", "--max", "9", "--source", "locations"]).output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["locations"][0]["text"], "california");
    assert_eq!(json["allSuggestions"], json["locations"]);
    assert_eq!(json["companyNames"], serde_json::json!([]));
    Ok(())
}

#[test]
fn search_reports_degradation_instead_of_failing() -> anyhow::Result<()> {
    let output = firmsearch().args(["search", "acme", "--mode", "hybrid", "--filters", "{not json"]).output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["totalResults"], 0);
    assert_eq!(json["searchMetadata"]["searchType"], "hybrid");
    assert_eq!(json["searchMetadata"]["degradation"]["kind"], "unreachable");
    Ok(())
}

#[test]
fn unknown_subcommand_fails() {
    firmsearch().arg("reindex").assert().failure().stderr(predicate::str::contains("unrecognized subcommand"));
}
