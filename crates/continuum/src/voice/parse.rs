//! Best-effort JSON extraction from LLM responses
//!
//! Models wrap JSON in prose and code fences, and sometimes break long string
//! values across lines. Candidates are tried in order: a ```` ```json ````
//! fence, any fence, then the span from the first `{` to the last `}`. Each
//! candidate is parsed as-is, then again after raw newlines inside string
//! literals are replaced with spaces.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap());

static ANY_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").unwrap());

/// Replace newlines that appear inside JSON string literals with spaces
pub fn repair_newlines(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_string = !in_string;
        } else if c == '\n' && in_string {
            out.push(' ');
            continue;
        }
        out.push(c);
    }

    out
}

fn non_empty_object(value: Value) -> Option<Value> {
    match &value {
        Value::Object(map) if !map.is_empty() => Some(value),
        _ => None,
    }
}

fn try_parse(candidate: &str) -> Option<Value> {
    serde_json::from_str(candidate)
        .ok()
        .and_then(non_empty_object)
        .or_else(|| {
            serde_json::from_str(&repair_newlines(candidate))
                .ok()
                .and_then(non_empty_object)
        })
}

/// Pull a non-empty JSON object out of free-form model output
pub fn parse_best_effort(text: &str) -> Option<Value> {
    let fenced = [&JSON_FENCE, &ANY_FENCE]
        .into_iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()));

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    };

    fenced.chain(span).find_map(try_parse)
}
