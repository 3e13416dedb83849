//! Voice profile extraction
//!
//! Writing samples are collected from disk, sent to an LLM with a fixed
//! analysis prompt, and the reply is parsed into a [`VoiceProfile`] that can
//! be rendered as `voice.md`.

pub mod analyzer;
pub mod parse;
pub mod profile;
pub mod prompts;
pub mod samples;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub use analyzer::{OpenRouterAnalyzer, VoiceAnalyzer};
pub use parse::parse_best_effort;
pub use profile::VoiceProfile;
pub use samples::{Samples, build_prompt, collect_samples};

/// Errors that can occur during voice analysis
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("No samples found in {}. Add .md or .txt files to analyze.", .0.display())]
    NoSamples(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one analysis call
#[derive(Debug, Clone)]
pub struct VoiceAnalysis {
    /// Model reply exactly as received
    pub raw_response: String,
    /// `None` when no usable profile could be read from the reply
    pub profile: Option<VoiceProfile>,
    pub sample_count: usize,
}

impl VoiceAnalysis {
    /// Markdown for `voice.md`, if the reply could be parsed
    pub fn markdown(&self) -> Option<String> {
        self.profile.as_ref().map(VoiceProfile::render_markdown)
    }
}

/// Read a typed profile out of a model reply
pub fn parse_profile(response: &str) -> Option<VoiceProfile> {
    let value = parse_best_effort(response)?;
    match serde_json::from_value(value) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Voice analysis JSON did not match the expected shape: {e}");
            None
        }
    }
}

/// Analyze the writing samples under `samples_dir` with `analyzer`.
pub async fn analyze_voice(
    analyzer: &dyn VoiceAnalyzer,
    samples_dir: &Path,
) -> Result<VoiceAnalysis, VoiceError> {
    let samples = collect_samples(samples_dir)?;
    let sample_count: usize = samples.values().map(Vec::len).sum();
    if sample_count == 0 {
        return Err(VoiceError::NoSamples(samples_dir.to_path_buf()));
    }

    info!(
        "Analyzing {} samples in {} categories with {}",
        sample_count,
        samples.len(),
        analyzer.name()
    );

    let prompt = build_prompt(&samples);
    let raw_response = analyzer.complete(&prompt).await?;
    let profile = parse_profile(&raw_response);
    if profile.is_none() {
        warn!("Could not parse a voice profile from the analysis response");
    }

    Ok(VoiceAnalysis {
        raw_response,
        profile,
        sample_count,
    })
}
