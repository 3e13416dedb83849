//! Integration tests for voice analysis
//!
//! Runs the full sample -> prompt -> API -> profile path against a mock
//! OpenAI-compatible server.

use std::time::Duration;

use continuum::config::VoiceConfig;
use continuum::testing::StaticAnalyzer;
use continuum::voice::{OpenRouterAnalyzer, VoiceError, analyze_voice};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_REPLY: &str = r#"Here's the analysis:

```json
{
  "core_dna": {"primary_qualities": ["Plainspoken - no filler"], "defining_tensions": ["Friendly but terse"]},
  "tone_spectrum": {"casual": "lowercase, emoji-free", "professional": "short paragraphs"},
  "do_patterns": ["Open with the conclusion"],
  "dont_patterns": ["Apologise for length"],
  "vocabulary": {"signature_phrases": {"confirmations": ["sounds good"]}, "avoided_words": ["leverage"]},
  "formatting": {"preferences": ["Numbered steps"]},
  "long_form": {"typical_length": "600 words", "characteristics": ["Concrete examples"]}
}
```
"#;

fn write_samples(dir: &std::path::Path) {
    std::fs::create_dir_all(dir.join("slack")).unwrap();
    std::fs::write(dir.join("slack").join("standup.txt"), "shipped the fix, sounds good").unwrap();
    std::fs::write(dir.join("essay.md"), "Why I stopped using leverage in emails.").unwrap();
}

fn config(api_url: String) -> VoiceConfig {
    VoiceConfig {
        api_url,
        model: "mock/model".to_string(),
        timeout_secs: 5,
        ..VoiceConfig::default()
    }
}

#[tokio::test]
async fn test_analyze_voice_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("SLACK SAMPLES"))
        .and(body_string_contains("GENERAL SAMPLES"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": MODEL_REPLY } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_samples(dir.path());

    let analyzer = OpenRouterAnalyzer::with_api_key(&config(server.uri()), "test-key").unwrap();
    let analysis = analyze_voice(&analyzer, dir.path()).await.unwrap();

    assert_eq!(analysis.sample_count, 2);
    assert_eq!(analysis.raw_response, MODEL_REPLY);

    let markdown = analysis.markdown().unwrap();
    assert!(markdown.starts_with("# Voice Profile"));
    assert!(markdown.contains("**Friendly but terse**"));
    assert!(markdown.contains("- **Confirmations**: \"sounds good\""));
    assert!(markdown.contains("- leverage"));
    assert!(markdown.contains("## Don't\n\n- Apologise for length"));
    assert!(!markdown.contains("## Structural Patterns"));
}

#[tokio::test]
async fn test_analyze_voice_survives_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "{\"do_patterns\": [\"Be brief\"]}" } }]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_samples(dir.path());

    let analyzer = OpenRouterAnalyzer::with_api_key(&config(server.uri()), "k")
        .unwrap()
        .with_initial_backoff(Duration::from_millis(5));
    let analysis = analyze_voice(&analyzer, dir.path()).await.unwrap();

    assert_eq!(analysis.profile.unwrap().do_patterns, vec!["Be brief"]);
}

#[tokio::test]
async fn test_analyze_voice_api_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    write_samples(dir.path());

    let analyzer = OpenRouterAnalyzer::with_api_key(&config(server.uri()), "k").unwrap();
    let err = analyze_voice(&analyzer, dir.path()).await.unwrap_err();
    assert!(matches!(err, VoiceError::ApiError(_)));
}

#[tokio::test]
async fn test_analyze_voice_no_samples() {
    let dir = tempdir().unwrap();
    let analyzer = StaticAnalyzer::new("{}");

    let err = analyze_voice(&analyzer, &dir.path().join("samples")).await.unwrap_err();
    assert!(err.to_string().starts_with("No samples found in"));
}

#[tokio::test]
async fn test_analyze_voice_repairs_broken_strings() {
    let dir = tempdir().unwrap();
    write_samples(dir.path());
    let analyzer =
        StaticAnalyzer::new("{\"long_form\": {\"typical_length\": \"300 to\n500 words\"}}");

    let analysis = analyze_voice(&analyzer, dir.path()).await.unwrap();
    let markdown = analysis.markdown().unwrap();
    assert!(markdown.contains("**Typical length**: 300 to 500 words"));
}
