// Runs the basenp binary: BIO output, phrase listing, stats and exit codes

mod integration;

use serde_json::Value;
use std::fs;

use basenp::format_bio;
use basenp::pipeline;
use integration::{assert_golden_file, fixtures, TestFixture};

/// Fixture with the full rule cascade written under the default file names
fn cascade_fixture() -> TestFixture {
    let fixture = TestFixture::new();
    fixture.create_rules(fixtures::EXTRACTION_RULES, fixtures::REJECTION_RULES);
    fixture.create_file("corpus.conll", fixtures::TAGGED_CORPUS);
    fixture
}

#[test]
fn test_bio_output_file() {
    let fixture = cascade_fixture();

    let output = fixture.run_cli(&["corpus.conll", "--output", "chunks.conll"]);
    assert!(output.status.success(), "basenp failed: {}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(fixture.path("chunks.conll")).expect("Failed to read BIO output");
    assert_golden_file(&written, fixtures::TAGGED_CORPUS_BIO, "BIO output");
    assert!(written.ends_with("bank\tNN\tI\n"), "output must stop after the last phrase");
}

#[test]
fn test_phrase_listing_on_stdout() {
    let fixture = cascade_fixture();

    let output = fixture.run_cli(&["corpus.conll"]);
    assert!(output.status.success(), "basenp failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected: String = fixtures::TAGGED_CORPUS_PHRASES
        .iter()
        .map(|(text, start, end, head)| format!("{start}\t{end}\t{head}\t{text}\n"))
        .collect();
    assert_golden_file(&stdout, &expected, "phrase listing");
}

#[test]
fn test_stats_output_json_structure() {
    let fixture = cascade_fixture();

    let output = fixture.run_cli(&["corpus.conll", "--stats-out", "stats.json", "--log-format", "pretty"]);
    assert!(output.status.success(), "basenp failed: {}", String::from_utf8_lossy(&output.stderr));

    let json_content = fs::read_to_string(fixture.path("stats.json")).expect("Failed to read stats file");
    let stats: Value = serde_json::from_str(&json_content).expect("Failed to parse JSON");

    let obj = stats.as_object().expect("Stats should be a JSON object");
    for key in [
        "sentences",
        "tokens",
        "candidates",
        "phrases",
        "unresolved_phrases",
        "offset_failures",
        "rejection_groups",
        "extraction_time_ms",
        "refinement_time_ms",
    ] {
        assert!(obj.contains_key(key), "Missing {key} field");
    }

    assert_eq!(obj["sentences"], 3);
    assert_eq!(obj["candidates"], 6);
    assert_eq!(obj["phrases"], 8);

    let groups = obj["rejection_groups"].as_array().expect("rejection_groups should be an array");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["delimiter"], "'s");
    assert_eq!(groups[1]["rejected"], 1);
}

#[test]
fn test_format_flag_overrides_extension() {
    let fixture = TestFixture::new();
    fixture.create_rules(fixtures::SINGLE_NOUN_RULES, "");
    fixture.create_file("corpus.txt", fixtures::SINGLE_NOUN_CORPUS);

    let output = fixture.run_cli(&["corpus.txt", "--format", "conll"]);
    assert!(output.status.success(), "basenp failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0\t2\tNN\tcat\n");
}

#[test]
fn test_missing_input_fails() {
    let fixture = cascade_fixture();

    let output = fixture.run_cli(&["absent.conll"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.conll"));
}

#[test]
fn test_missing_default_rules_fail() {
    let fixture = TestFixture::new();
    fixture.create_file("corpus.conll", fixtures::SINGLE_NOUN_CORPUS);

    let output = fixture.run_cli(&["corpus.conll", "--output", "chunks.conll"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("positiveRules.txt"));
    assert!(!fixture.path("chunks.conll").exists(), "no output after a rule failure");
}

#[tokio::test]
async fn test_library_bio_matches_cli_output() {
    let fixture = cascade_fixture();
    let config = fixture.config(fixture.create_rules(fixtures::EXTRACTION_RULES, fixtures::REJECTION_RULES));

    let extraction = pipeline::run(&config, &fixture.path("corpus.conll"))
        .await
        .expect("run should succeed");

    assert_eq!(format_bio(&extraction.sentences, &extraction.phrases), fixtures::TAGGED_CORPUS_BIO);
}
