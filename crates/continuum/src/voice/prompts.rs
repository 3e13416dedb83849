//! Prompt for LLM-based voice analysis

/// Instructions sent ahead of the writing samples.
///
/// The samples are appended after the trailing `WRITING SAMPLES:` marker by
/// [`build_prompt`](crate::voice::build_prompt).
pub const ANALYSIS_PROMPT: &str = r#"You are an expert communication analyst. Analyze the following writing samples and extract a comprehensive voice profile.

All samples were written by the same person. Identify:
1. Core voice characteristics (the defining tensions and qualities)
2. Vocabulary patterns (signature phrases, preferred words, avoided words)
3. Structural patterns (how they organize information)
4. Tone spectrum (how formality varies by context)
5. Do/Don't patterns (explicit preferences)
6. Example templates for common communication types

Return your analysis as COMPACT JSON (no line breaks within string values) with this exact structure:

```json
{
  "core_dna": {
    "primary_qualities": ["quality1 - explanation", "quality2 - explanation"],
    "defining_tensions": ["tension1: description", "tension2: description"]
  },
  "vocabulary": {
    "signature_phrases": {
      "acknowledgments": ["phrase1", "phrase2"],
      "confirmations": ["phrase1", "phrase2"],
      "transitions": ["phrase1", "phrase2"],
      "emphasis": ["phrase1", "phrase2"]
    },
    "preferred_words": ["word1", "word2"],
    "avoided_words": ["word1", "word2"],
    "banned_phrases": ["phrase1", "phrase2"]
  },
  "structure": {
    "paragraph_style": "typical paragraph length and flow",
    "list_usage": "when bullets vs prose",
    "opening_patterns": ["pattern1", "pattern2"],
    "closing_patterns": ["pattern1", "pattern2"],
    "common_templates": [
      {
        "type": "email_status_update",
        "template": "template text with [placeholders]"
      }
    ]
  },
  "tone_spectrum": {
    "casual": "casual tone (chat)",
    "professional": "professional tone (email)",
    "formal": "formal tone (executive or external)"
  },
  "do_patterns": ["pattern1", "pattern2"],
  "dont_patterns": ["pattern1", "pattern2"],
  "formatting": {
    "preferences": ["pref1", "pref2"],
    "avoid": ["avoid1", "avoid2"]
  },
  "long_form": {
    "typical_length": "word count range",
    "characteristics": ["char1", "char2"]
  }
}
```

Be specific and grounded in the actual samples. Quote exact phrases from the samples as evidence. If a pattern isn't clearly present, omit it rather than inventing one.

---

WRITING SAMPLES:

"#;
