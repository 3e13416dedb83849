//! Heading-preserving word-budget truncation
//!
//! Long Markdown documents are cut down to a word budget by keeping whole
//! lines from the top. Headings count against the budget like any other line
//! and are never dropped while body text after them is kept.

/// Count whitespace-delimited words
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A Markdown ATX heading: one or more `#` followed by a space.
pub fn is_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    hashes > 0 && line.as_bytes().get(hashes) == Some(&b' ')
}

/// Truncate `document` to roughly `max_words` words.
///
/// Documents within budget come back unchanged. Otherwise lines are kept from
/// the top until the next line would push the count past `max_words`. The
/// first worded line is kept regardless when it is a heading, so the result
/// runs over only when that heading alone exceeds the budget. Lines are never
/// split.
pub fn condense(document: &str, max_words: usize) -> String {
    if word_count(document) <= max_words {
        return document.to_string();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0usize;

    for line in document.split('\n') {
        let words = word_count(line);
        let leading_heading = used == 0 && is_heading(line);

        if !leading_heading && used + words > max_words {
            break;
        }

        kept.push(line);
        used += words;
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_short_content_unchanged() {
        let content = "# Title\n\nShort paragraph here.";
        assert_eq!(condense(content, 500), content);
    }

    #[test]
    fn test_exact_budget_unchanged() {
        let content = "# Title\n\none two three";
        assert_eq!(word_count(content), 5);
        assert_eq!(condense(content, 5), content);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(condense("", 500), "");
        assert_eq!(condense("", 0), "");
    }

    #[test]
    fn test_truncates_at_word_limit() {
        let content = format!("# Title\n\n{}", words(100));
        let result = condense(&content, 20);
        assert!(word_count(&result) <= 25);
        assert_eq!(result, "# Title\n");
    }

    #[test]
    fn test_keeps_whole_lines_only() {
        let content = "one two three\nfour five six\nseven eight nine";
        let result = condense(content, 7);
        assert_eq!(result, "one two three\nfour five six");
        for line in result.lines() {
            assert!(content.lines().any(|l| l == line));
        }
    }

    #[test]
    fn test_preserves_headers() {
        let content = format!(
            "# Title\n\n{}\n\n## Section Two\n\nMore text.",
            words(50)
        );
        let result = condense(&content, 10);
        assert!(result.contains("# Title"));
    }

    #[test]
    fn test_heading_kept_before_body_text() {
        let content = "# Top\nalpha beta\n## Middle\ngamma delta\n## Bottom\nepsilon zeta eta theta";
        let result = condense(content, 10);
        assert_eq!(result, "# Top\nalpha beta\n## Middle\ngamma delta\n## Bottom");
    }

    #[test]
    fn test_heading_counts_against_budget() {
        let content = "# Top\nalpha beta\n## Middle\ngamma delta\n## Bottom\nepsilon zeta eta theta";
        assert_eq!(condense(content, 9), "# Top\nalpha beta\n## Middle\ngamma delta");
    }

    #[test]
    fn test_long_heading_mid_document_not_kept() {
        let content = format!("# Title\n{}\n## {}\nbody", words(5), words(40));
        let result = condense(&content, 10);
        assert_eq!(result, format!("# Title\n{}", words(5)));
        assert!(word_count(&result) <= 10);
    }

    #[test]
    fn test_leading_heading_kept_over_budget() {
        let content = format!("\n# {}\nbody text", words(12));
        let result = condense(&content, 5);
        assert_eq!(result, format!("\n# {}", words(12)));
        assert_eq!(condense(&result, 5), result);
    }

    #[test]
    fn test_heading_dropped_once_budget_spent() {
        let content = "# A\none two\n## B\nthree";
        // "# A" + "one two" uses 4 words; "## B" arrives with nothing left
        assert_eq!(condense(content, 4), "# A\none two");
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("# Title"));
        assert!(is_heading("### Deep"));
        assert!(!is_heading("#hashtag"));
        assert!(!is_heading("#"));
        assert!(!is_heading(" # indented"));
        assert!(!is_heading("plain"));
    }

    #[test]
    fn test_condense_is_idempotent() {
        let docs = [
            format!("# Title\n\n{}\n\n## Two\n\n{}", words(30), words(30)),
            format!("{}\n{}\n# H\n{}", words(3), words(4), words(5)),
            "# Only\n## Headings\n### Here".to_string(),
            String::new(),
        ];
        for doc in &docs {
            for budget in [0, 1, 3, 5, 10, 40, 100] {
                let once = condense(doc, budget);
                assert_eq!(condense(&once, budget), once, "budget {budget}");
            }
        }
    }

    #[test]
    fn test_headings_before_cut_survive() {
        let content = format!(
            "# One\n{}\n## Two\n{}\n## Three\n{}",
            words(5),
            words(5),
            words(50)
        );
        let result = condense(&content, 16);
        assert!(result.contains("# One"));
        assert!(result.contains("## Two"));
        assert!(result.contains("## Three"));
        assert!(!result.contains(&words(50)));
    }
}
