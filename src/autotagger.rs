//! Keyword-based tag suggestions for journal entries.
//!
//! Each rule maps a tag to a set of trigger words. A rule fires when any of
//! its words occurs as a substring of the lowercased content; rules are
//! checked in order and at most [`MAX_AUTO_TAGS`] tags are kept.
//!
//! # Examples
//!
//! ```
//! use smart_notes::autotagger::KeywordTagger;
//!
//! let tags = KeywordTagger::default().suggest_tags("Grateful for a great project meeting");
//! assert_eq!(tags, vec!["positive", "gratitude", "work"]);
//! ```

/// Upper bound on suggested tags per entry.
pub const MAX_AUTO_TAGS: usize = 3;

/// A tag and the words that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    pub tag: &'static str,
    pub keywords: &'static [&'static str],
}

/// Emotion rules first, then activity rules.
pub const DEFAULT_RULES: &[TagRule] = &[
    TagRule {
        tag: "positive",
        keywords: &["happy", "joy", "excited", "great", "amazing"],
    },
    TagRule {
        tag: "challenging",
        keywords: &["sad", "upset", "frustrated", "angry", "stressed"],
    },
    TagRule {
        tag: "gratitude",
        keywords: &["grateful", "thankful", "appreciate"],
    },
    TagRule {
        tag: "work",
        keywords: &["work", "job", "meeting", "project"],
    },
    TagRule {
        tag: "relationships",
        keywords: &["family", "friend", "relationship"],
    },
    TagRule {
        tag: "learning",
        keywords: &["learn", "study", "read", "course"],
    },
    TagRule {
        tag: "goals",
        keywords: &["goal", "plan", "future", "dream"],
    },
];

/// Suggests tags by matching keyword rules against note content.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    rules: &'static [TagRule],
    max_tags: usize,
}

impl Default for KeywordTagger {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES,
            max_tags: MAX_AUTO_TAGS,
        }
    }
}

impl KeywordTagger {
    /// Returns the tags whose rules match `content`, in rule order.
    #[must_use]
    pub fn suggest_tags(&self, content: &str) -> Vec<String> {
        let lower = content.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
            .map(|rule| rule.tag.to_string())
            .take(self.max_tags)
            .collect()
    }
}
