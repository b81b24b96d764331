//! Placeholder recognition.
//!
//! A template marks a value to be filled in later with one of five syntaxes. The
//! syntaxes are tried in a fixed order and the first one found anywhere in the text
//! wins; a cell describes at most one placeholder.
use crate::analysis::report::FillableInfo;
use crate::analysis::report::PatternType;
use regex::Regex;
use std::sync::LazyLock;

static PATTERNS: LazyLock<[(PatternType, Regex); 5]> = LazyLock::new(|| {
    let pattern = |regex: &str| Regex::new(regex).expect("Hardcode regex pattern");
    [
        (PatternType::DoubleBracket, pattern(r"\[\[([^\]]+)\]\]")),
        (PatternType::SingleBracketCaps, pattern(r"\[([A-Z_][A-Z0-9_]*)\]")),
        (PatternType::DoubleCurly, pattern(r"\{\{([^}]+)\}\}")),
        (PatternType::SingleCurlyCaps, pattern(r"\{([A-Z_][A-Z0-9_]*)\}")),
        (PatternType::AngleBrackets, pattern(r"<([A-Z_][A-Z0-9_]*)>")),
    ]
});

impl PatternType {
    /// Field name for a captured placeholder. Free-text syntaxes turn spaces into
    /// underscores; identifier syntaxes are only lowercased.
    fn field_name(&self, placeholder: &str) -> String {
        match self {
            Self::DoubleBracket | Self::DoubleCurly => placeholder.replace(' ', "_").to_lowercase(),
            Self::SingleBracketCaps | Self::SingleCurlyCaps | Self::AngleBrackets => placeholder.to_lowercase(),
        }
    }
}

/// Returns the first placeholder found in `text`, if any.
pub(crate) fn detect_fillable(text: &str) -> Option<FillableInfo> {
    let text = text.trim();
    PATTERNS.iter().find_map(|(pattern_type, regex)| {
        let placeholder = regex.captures(text)?.get(1)?.as_str();
        Some(FillableInfo {
            pattern_type: *pattern_type,
            field_name: pattern_type.field_name(placeholder),
            placeholder_text: placeholder.to_owned(),
        })
    })
}
