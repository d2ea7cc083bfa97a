//! Verb classification.
//!
//! Dispatch is a fixed priority list of guarded rules. The first rule whose
//! guard accepts the input decides the verb; [`DISPATCH_ORDER`] is the
//! contract and is tested as such.

use std::fmt;

/// Phrases answered with usage text. Matched exactly after lower-casing and trimming.
pub const HELP_PHRASES: &[&str] = &[
    "help",
    "?",
    "help me",
    "commands",
    "usage",
    "what can you do",
    "what can you do?",
];

/// Keywords that introduce a correction.
pub const CORRECT_KEYWORDS: &[&str] = &["fix", "correct"];

/// Keywords that introduce a focus change.
pub const FOCUS_KEYWORDS: &[&str] = &["zoom", "focus"];

/// Operator intent recognised from the leading verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Disrupt,
    Correct,
    Reroute,
    Status,
    Where,
    Focus,
    Help,
    /// No rule matched.
    Unknown,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Disrupt => "disrupt",
            Verb::Correct => "correct",
            Verb::Reroute => "reroute",
            Verb::Status => "status",
            Verb::Where => "where",
            Verb::Focus => "focus",
            Verb::Help => "help",
            Verb::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Trimmed input with its lower-cased form and leading word.
#[derive(Debug, Clone)]
pub struct Command<'a> {
    /// Trimmed text with original casing.
    pub text: &'a str,
    pub lower: String,
    /// First run of alphanumerics, lower-cased. Empty if there is none.
    pub first_word: String,
}

impl<'a> Command<'a> {
    pub fn new(raw: &'a str) -> Self {
        let text = raw.trim();
        let lower = text.to_lowercase();
        let first_word = lower
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())
            .unwrap_or_default()
            .to_string();
        Self {
            text,
            lower,
            first_word,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text after the leading word, original casing, trimmed.
    ///
    /// Returns the whole text when the leading word does not start with `keyword`.
    pub fn rest_after(&self, keyword: &str) -> &'a str {
        if !self.first_word.starts_with(keyword) {
            return self.text;
        }
        let start = self
            .text
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i)
            .unwrap_or(0);
        let end = self.text[start..]
            .char_indices()
            .find(|(_, c)| !c.is_alphanumeric())
            .map(|(i, _)| start + i)
            .unwrap_or(self.text.len());
        self.text[end..].trim()
    }

    fn has_word(&self, word: &str) -> bool {
        self.lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| w == word)
    }

    /// The first of `words` that the leading word starts with.
    pub fn leading_keyword(&self, words: &[&'static str]) -> Option<&'static str> {
        words
            .iter()
            .copied()
            .find(|w| self.first_word.starts_with(*w))
    }

    fn leads_with(&self, words: &[&'static str]) -> bool {
        self.leading_keyword(words).is_some()
    }
}

/// One guarded dispatch case.
pub struct Rule {
    pub verb: Verb,
    pub guard: fn(&Command<'_>) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("verb", &self.verb).finish()
    }
}

/// Dispatch rules in priority order.
pub const DISPATCH_ORDER: &[Rule] = &[
    Rule {
        verb: Verb::Disrupt,
        guard: |c| c.leads_with(&["disrupt"]),
    },
    Rule {
        verb: Verb::Correct,
        guard: |c| c.leads_with(CORRECT_KEYWORDS),
    },
    Rule {
        verb: Verb::Reroute,
        guard: |c| c.leads_with(&["reroute"]) || c.has_word("reroute"),
    },
    Rule {
        verb: Verb::Status,
        guard: |c| c.leads_with(&["status"]),
    },
    Rule {
        verb: Verb::Where,
        guard: |c| c.leads_with(&["where"]),
    },
    Rule {
        verb: Verb::Focus,
        guard: |c| c.leads_with(FOCUS_KEYWORDS),
    },
    Rule {
        verb: Verb::Help,
        guard: |c| HELP_PHRASES.contains(&c.lower.as_str()),
    },
];

/// Pick the verb for a command. Empty input is [`Verb::Unknown`].
pub fn classify(command: &Command<'_>) -> Verb {
    DISPATCH_ORDER
        .iter()
        .find(|rule| (rule.guard)(command))
        .map(|rule| rule.verb)
        .unwrap_or(Verb::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verb(text: &str) -> Verb {
        classify(&Command::new(text))
    }

    #[test]
    fn test_dispatch_order_is_fixed() {
        let order: Vec<Verb> = DISPATCH_ORDER.iter().map(|r| r.verb).collect();
        assert_eq!(
            order,
            [
                Verb::Disrupt,
                Verb::Correct,
                Verb::Reroute,
                Verb::Status,
                Verb::Where,
                Verb::Focus,
                Verb::Help,
            ]
        );
    }

    #[test]
    fn test_leading_verbs_case_insensitive() {
        assert_eq!(verb("DISRUPT Delhi"), Verb::Disrupt);
        assert_eq!(verb("Fix Delhi-Hyderabad"), Verb::Correct);
        assert_eq!(verb("correct it"), Verb::Correct);
        assert_eq!(verb("Reroute Delhi -> Mumbai"), Verb::Reroute);
        assert_eq!(verb("status WH2"), Verb::Status);
        assert_eq!(verb("Where is T12?"), Verb::Where);
        assert_eq!(verb("zoom to Delhi"), Verb::Focus);
        assert_eq!(verb("Focus Hyderabad"), Verb::Focus);
    }

    #[test]
    fn test_reroute_matches_anywhere() {
        assert_eq!(verb("please reroute Delhi -> Mumbai -> Hyd"), Verb::Reroute);
        // Higher-priority verbs win over an embedded "reroute".
        assert_eq!(verb("disrupt and reroute"), Verb::Disrupt);
        assert_eq!(verb("fix the reroute"), Verb::Correct);
        // A later verb does not beat "reroute" anywhere in the text.
        assert_eq!(verb("show status then reroute"), Verb::Reroute);
    }

    #[test]
    fn test_help_requires_exact_phrase() {
        assert_eq!(verb("help"), Verb::Help);
        assert_eq!(verb("  HELP  "), Verb::Help);
        assert_eq!(verb("?"), Verb::Help);
        assert_eq!(verb("what can you do?"), Verb::Help);
        assert_eq!(verb("help with delhi"), Verb::Unknown);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(verb("make it rain"), Verb::Unknown);
        assert_eq!(verb(""), Verb::Unknown);
        assert_eq!(verb("the disruption at delhi"), Verb::Unknown);
    }

    #[test]
    fn test_leading_verb_matches_as_prefix() {
        assert_eq!(verb("Disruption Delhi -> Hyderabad"), Verb::Disrupt);
        assert_eq!(verb("Rerouting Delhi -> Mumbai -> Hyderabad"), Verb::Reroute);
        assert_eq!(verb("Fixed Delhi-Hyderabad"), Verb::Correct);
        assert_eq!(verb("Corrected it"), Verb::Correct);
        assert_eq!(verb("statuses WH2"), Verb::Status);
        assert_eq!(verb("Zooming Hyderabad"), Verb::Focus);
    }

    #[test]
    fn test_leading_keyword_picks_first_listed_match() {
        let cmd = Command::new("Fixed Delhi-Hyderabad");
        assert_eq!(cmd.leading_keyword(CORRECT_KEYWORDS), Some("fix"));
        let cmd = Command::new("Zooming in");
        assert_eq!(cmd.leading_keyword(FOCUS_KEYWORDS), Some("zoom"));
        assert_eq!(cmd.leading_keyword(CORRECT_KEYWORDS), None);
    }

    #[test]
    fn test_rest_after_keyword_keeps_casing() {
        let cmd = Command::new("  Status Mumbai, Kolkata ");
        assert_eq!(cmd.rest_after("status"), "Mumbai, Kolkata");
        let cmd = Command::new("please reroute Delhi");
        assert_eq!(cmd.rest_after("reroute"), "please reroute Delhi");
        let cmd = Command::new("status");
        assert_eq!(cmd.rest_after("status"), "");
        let cmd = Command::new("Rerouting Delhi -> Mumbai");
        assert_eq!(cmd.rest_after("reroute"), "Delhi -> Mumbai");
    }
}
