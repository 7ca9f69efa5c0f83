// ============================================================
// Layer 4 — Report Text Preprocessor
// ============================================================
// Turns a bug report's summary and description into the token
// sequence the vocabulary is built from.
//
// Bug report text is a mix of prose, stack traces, and code
// identifiers pasted from the IDE:
//   "NullPointerException in XMLParser.parseNode() when\u{00A0}..."
//
// Steps (applied in order):
//   1. Normalise whitespace and control characters
//   2. Split on anything that is not a letter or digit
//   3. Split identifiers at camelCase and letter/digit
//      boundaries: XMLParser → xml parser, utf8Decode → utf 8 decode
//   4. Lowercase
//   5. Drop stop words, single characters, and pure numbers
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

/// Common English words that carry no localisation signal
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "may", "me",
    "my", "no", "not", "of", "on", "or", "our", "she", "should", "so", "some", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "too",
    "us", "was", "we", "were", "what", "when", "where", "which", "while", "who", "will",
    "with", "would", "you", "your",
];

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Tokens of a report: summary tokens followed by description tokens
    pub fn report_tokens(&self, summary: &str, description: &str) -> Vec<String> {
        let mut tokens = self.tokenize(summary);
        tokens.extend(self.tokenize(description));
        tokens
    }

    /// Normalise, split, and filter a free-text string
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .flat_map(split_identifier)
            .map(|part| part.to_lowercase())
            .filter(|token| keep_token(token))
            .collect()
    }

    /// Map whitespace variants to plain spaces and collapse runs.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Normalise individual characters ───────────────────────────
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' | '\r' | '\n' => ' ',
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // ── Step 2: Collapse repeated spaces ─────────────────────────────────
        normalised.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Split one alphanumeric word at case and letter/digit boundaries
fn split_identifier(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut parts   = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary =
                // fooBar → foo | Bar
                (prev.is_lowercase() && c.is_uppercase())
                // XMLParser → XML | Parser
                || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase))
                // utf8 → utf | 8, 8bit → 8 | bit
                || (prev.is_alphabetic() != c.is_alphabetic());
            if boundary && !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn keep_token(token: &str) -> bool {
    token.chars().count() > 1
        && !token.chars().all(|c| c.is_ascii_digit())
        && !STOP_WORDS.contains(&token)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello \t\u{00A0} world\r\n"), "hello world");
        assert_eq!(p.clean(""), "");
    }

    #[test]
    fn test_splits_camel_case() {
        assert_eq!(split_identifier("parseNode"), vec!["parse", "Node"]);
        assert_eq!(split_identifier("XMLParser"), vec!["XML", "Parser"]);
        assert_eq!(split_identifier("utf8Decode"), vec!["utf", "8", "Decode"]);
        assert_eq!(split_identifier("plain"), vec!["plain"]);
    }

    #[test]
    fn test_tokenize_report_text() {
        let p = Preprocessor::new();
        let tokens = p.tokenize("NullPointerException in XMLParser.parseNode() when the file is 0 bytes");
        assert_eq!(
            tokens,
            vec!["null", "pointer", "exception", "xml", "parser", "parse", "node", "file", "bytes"]
        );
    }

    #[test]
    fn test_report_tokens_concatenates_summary_then_description() {
        let p = Preprocessor::new();
        let tokens = p.report_tokens("Crash on save", "Editor freezes");
        assert_eq!(tokens, vec!["crash", "save", "editor", "freezes"]);
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        let p = Preprocessor::new();
        assert!(p.tokenize("").is_empty());
        assert!(p.tokenize("  ... !! ").is_empty());
    }
}
