//! Writing sample collection and prompt assembly

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::voice::VoiceError;
use crate::voice::prompts::ANALYSIS_PROMPT;

/// Category for files placed directly in the samples directory
pub const GENERAL_CATEGORY: &str = "general";

/// Samples longer than this many characters are cut before prompting
pub const MAX_SAMPLE_CHARS: usize = 5000;

const SAMPLE_EXTENSIONS: &[&str] = &["md", "txt", "eml"];

/// Writing samples grouped by category
pub type Samples = BTreeMap<String, Vec<String>>;

fn is_sample_file(path: &Path) -> bool {
    path.is_file()
        && match path.extension() {
            None => true,
            Some(ext) => SAMPLE_EXTENSIONS.iter().any(|e| ext == *e),
        }
}

fn read_sample(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            (!text.trim().is_empty()).then_some(text)
        }
        Err(e) => {
            warn!("Skipping unreadable sample {}: {e}", path.display());
            None
        }
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>, VoiceError> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Collect writing samples from `dir`.
///
/// Each sub-directory is a category named after the directory; files at the
/// top level go under [`GENERAL_CATEGORY`]. Only `.md`, `.txt`, `.eml` and
/// extension-less files are read, and blank files are skipped. A missing
/// directory yields no samples.
pub fn collect_samples(dir: &Path) -> Result<Samples, VoiceError> {
    let mut samples = Samples::new();
    if !dir.is_dir() {
        return Ok(samples);
    }

    for path in sorted_entries(dir)? {
        if path.is_dir() {
            let category = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let texts: Vec<String> = sorted_entries(&path)?
                .iter()
                .filter(|p| is_sample_file(p))
                .filter_map(|p| read_sample(p))
                .collect();
            if !texts.is_empty() {
                samples.entry(category).or_default().extend(texts);
            }
        } else if is_sample_file(&path) {
            if let Some(text) = read_sample(&path) {
                samples
                    .entry(GENERAL_CATEGORY.to_string())
                    .or_default()
                    .push(text);
            }
        }
    }

    debug!(
        categories = samples.len(),
        total = samples.values().map(Vec::len).sum::<usize>(),
        "Collected writing samples"
    );
    Ok(samples)
}

/// Build the full analysis prompt: instructions followed by every sample.
pub fn build_prompt(samples: &Samples) -> String {
    let mut prompt = ANALYSIS_PROMPT.to_string();

    for (category, texts) in samples {
        prompt.push_str(&format!("\n## {} SAMPLES\n\n", category.to_uppercase()));
        for (i, text) in texts.iter().enumerate() {
            let body = if text.chars().count() > MAX_SAMPLE_CHARS {
                let cut: String = text.chars().take(MAX_SAMPLE_CHARS).collect();
                format!("{cut}\n[... truncated ...]")
            } else {
                text.clone()
            };
            prompt.push_str(&format!("### Sample {}\n```\n{body}\n```\n\n", i + 1));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_samples_groups_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("email")).unwrap();
        fs::write(dir.path().join("email").join("a.eml"), "Hi team").unwrap();
        fs::write(dir.path().join("email").join("b.txt"), "Quick update").unwrap();
        fs::write(dir.path().join("post.md"), "A blog post").unwrap();
        fs::write(dir.path().join("NOTES"), "no extension").unwrap();

        let samples = collect_samples(dir.path()).unwrap();

        assert_eq!(samples["email"], vec!["Hi team", "Quick update"]);
        assert_eq!(samples[GENERAL_CATEGORY].len(), 2);
        assert!(samples[GENERAL_CATEGORY].contains(&"A blog post".to_string()));
    }

    #[test]
    fn test_collect_samples_skips_blank_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blank.md"), "  \n\n").unwrap();
        fs::write(dir.path().join("image.png"), "binary").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let samples = collect_samples(dir.path()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_collect_samples_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let samples = collect_samples(&dir.path().join("nope")).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_build_prompt_layout() {
        let mut samples = Samples::new();
        samples.insert("slack".to_string(), vec!["sounds good".to_string()]);

        let prompt = build_prompt(&samples);

        assert!(prompt.starts_with(ANALYSIS_PROMPT));
        assert!(prompt.contains("\n## SLACK SAMPLES\n\n### Sample 1\n```\nsounds good\n```\n"));
    }

    #[test]
    fn test_build_prompt_truncates_long_samples() {
        let mut samples = Samples::new();
        samples.insert(
            GENERAL_CATEGORY.to_string(),
            vec!["a".repeat(MAX_SAMPLE_CHARS + 100)],
        );

        let prompt = build_prompt(&samples);

        assert!(prompt.contains("[... truncated ...]"));
        assert!(!prompt.contains(&"a".repeat(MAX_SAMPLE_CHARS + 1)));
        assert!(prompt.contains(&"a".repeat(MAX_SAMPLE_CHARS)));
    }
}
