//! Structured voice profile and its Markdown rendering

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreDna {
    #[serde(default)]
    pub primary_qualities: Vec<String>,
    #[serde(default)]
    pub defining_tensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Phrase groups keyed by kind, e.g. `acknowledgments`
    #[serde(default)]
    pub signature_phrases: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub preferred_words: Vec<String>,
    #[serde(default)]
    pub avoided_words: Vec<String>,
    #[serde(default)]
    pub banned_phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub paragraph_style: Option<String>,
    pub list_usage: Option<String>,
    #[serde(default)]
    pub opening_patterns: Vec<String>,
    #[serde(default)]
    pub closing_patterns: Vec<String>,
    #[serde(default)]
    pub common_templates: Vec<MessageTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneSpectrum {
    pub casual: Option<String>,
    pub professional: Option<String>,
    pub formal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formatting {
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongForm {
    pub typical_length: Option<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

/// Voice profile as returned by the analysis model.
///
/// Every part is optional; sections that are absent are left out of the
/// rendered Markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub core_dna: Option<CoreDna>,
    pub vocabulary: Option<Vocabulary>,
    pub structure: Option<Structure>,
    pub tone_spectrum: Option<ToneSpectrum>,
    #[serde(default)]
    pub do_patterns: Vec<String>,
    #[serde(default)]
    pub dont_patterns: Vec<String>,
    pub formatting: Option<Formatting>,
    pub long_form: Option<LongForm>,
}

/// Capitalise the first letter of every alphabetic run, lower-casing the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn bullets(lines: &mut Vec<String>, items: &[String]) {
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push(String::new());
}

impl VoiceProfile {
    /// Render the profile as the Markdown body of `voice.md`
    pub fn render_markdown(&self) -> String {
        let mut lines: Vec<String> = vec!["# Voice Profile".into(), String::new(), String::new()];

        if let Some(dna) = &self.core_dna {
            heading(&mut lines, "## Core DNA");
            for tension in &dna.defining_tensions {
                lines.push(format!("**{tension}**"));
                lines.push(String::new());
            }
            if !dna.primary_qualities.is_empty() {
                bullets(&mut lines, &dna.primary_qualities);
                lines.push(String::new());
            }
        }

        if let Some(tone) = &self.tone_spectrum {
            heading(&mut lines, "## Tone Spectrum");
            let labelled = [
                ("Casual (Teams/Slack)", &tone.casual),
                ("Professional (Email)", &tone.professional),
                ("Formal (Exec/External)", &tone.formal),
            ];
            for (label, text) in labelled {
                if let Some(text) = text {
                    lines.push(format!("- **{label}**: {text}"));
                }
            }
            lines.push(String::new());
        }

        for (title, patterns) in [("## Do", &self.do_patterns), ("## Don't", &self.dont_patterns)] {
            if !patterns.is_empty() {
                heading(&mut lines, title);
                bullets(&mut lines, patterns);
                lines.push(String::new());
            }
        }

        if let Some(vocab) = &self.vocabulary {
            heading(&mut lines, "## Vocabulary");

            if let Some(groups) = &vocab.signature_phrases {
                heading(&mut lines, "### Signature Phrases");
                for (kind, phrases) in groups.iter().filter(|(_, p)| !p.is_empty()) {
                    let quoted: Vec<String> = phrases.iter().map(|p| format!("\"{p}\"")).collect();
                    lines.push(format!("- **{}**: {}", title_case(kind), quoted.join(", ")));
                }
                lines.push(String::new());
            }

            if !vocab.avoided_words.is_empty() || !vocab.banned_phrases.is_empty() {
                heading(&mut lines, "### Avoid");
                bullets(&mut lines, &vocab.avoided_words);
                lines.extend(vocab.banned_phrases.iter().map(|p| format!("- \"{p}\"")));
                lines.push(String::new());
            }
        }

        if let Some(structure) = &self.structure {
            heading(&mut lines, "## Structural Patterns");
            if let Some(style) = &structure.paragraph_style {
                lines.push(format!("**Paragraph style**: {style}"));
                lines.push(String::new());
            }
            if let Some(usage) = &structure.list_usage {
                lines.push(format!("**List usage**: {usage}"));
                lines.push(String::new());
            }
            for template in &structure.common_templates {
                lines.push(format!(
                    "**{}**:",
                    template.kind.as_deref().unwrap_or("Template")
                ));
                lines.push("```".into());
                lines.push(template.template.clone().unwrap_or_default());
                lines.push("```".into());
                lines.push(String::new());
            }
        }

        if let Some(formatting) = &self.formatting {
            heading(&mut lines, "## Formatting");
            bullets(&mut lines, &formatting.preferences);
            lines.push(String::new());
        }

        if let Some(long_form) = &self.long_form {
            heading(&mut lines, "## Long-Form Writing");
            if let Some(length) = &long_form.typical_length {
                lines.push(format!("**Typical length**: {length}"));
            }
            if !long_form.characteristics.is_empty() {
                lines.push(String::new());
                bullets(&mut lines, &long_form.characteristics);
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}
