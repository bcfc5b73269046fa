//! Self-mention detection.
//!
//! Two rules are available:
//!
//! - [`MentionMatch::Substring`] (default): the text contains the username
//!   anywhere, case-sensitive. `"alice2 says hi"` mentions `alice`.
//! - [`MentionMatch::Word`]: the username appears as a whole word, ASCII
//!   case-insensitive. `"@Alice hi"` mentions `alice`, `"alice2"` does not.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MentionMatch {
    #[default]
    Substring,
    Word,
}

/// Returns true if `text` mentions `username` under the given rule.
/// An empty username never matches.
pub fn is_self_mention(text: &str, username: &str, rule: MentionMatch) -> bool {
    if username.is_empty() {
        return false;
    }
    match rule {
        MentionMatch::Substring => text.contains(username),
        MentionMatch::Word => contains_word(text, username),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn contains_word(text: &str, word: &str) -> bool {
    let haystack = text.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();

    // ASCII lowercasing keeps byte offsets identical to `text`.
    haystack.match_indices(&needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        before_ok && after_ok
    })
}
