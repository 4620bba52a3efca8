//! Syntax highlighting for fenced code blocks

use lazy_static::lazy_static;
use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Theme used when none is configured, close to the Tomorrow palette
pub const DEFAULT_THEME: &str = "base16-eighties.dark";

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
    static ref LANGUAGE_CLASS: Regex = Regex::new(r"language-(\w+)").unwrap();
}

/// Language tag from a `language-<tag>` class marker
pub fn language_from_class(class: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A highlighted code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedBlock {
    pub language: String,
    /// Source text, without its trailing newline
    pub code: String,
    /// Highlighted markup
    pub html: String,
}

/// Highlighter bound to one color theme.
///
/// Only the immutable syntax and theme definitions are shared; every call
/// builds its own highlighting state.
#[derive(Debug, Clone)]
pub struct Highlighter {
    theme_name: String,
}

impl Highlighter {
    /// Create a highlighter, falling back to [`DEFAULT_THEME`] for unknown themes
    pub fn new(theme: &str) -> Self {
        let theme_name = if THEME_SET.themes.contains_key(theme) {
            theme.to_string()
        } else {
            tracing::warn!(
                "Unknown highlight theme {:?}, using {}",
                theme,
                DEFAULT_THEME
            );
            DEFAULT_THEME.to_string()
        };
        Self { theme_name }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Whether a language tag names a known syntax
    pub fn supports(&self, language: &str) -> bool {
        find_syntax(language).is_some()
    }

    /// Highlight `code` as `language`.
    ///
    /// Returns `None` when the language is unknown or highlighting fails, so
    /// the caller can fall back to plain rendering.
    pub fn highlight(&self, language: &str, code: &str) -> Option<HighlightedBlock> {
        let syntax = find_syntax(language)?;
        let theme = self.theme()?;
        let code = code.strip_suffix('\n').unwrap_or(code);

        match highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
            Ok(html) => Some(HighlightedBlock {
                language: language.to_string(),
                code: code.to_string(),
                html,
            }),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", language, e);
                None
            }
        }
    }

    fn theme(&self) -> Option<&'static Theme> {
        THEME_SET
            .themes
            .get(&self.theme_name)
            .or_else(|| THEME_SET.themes.values().next())
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    SYNTAX_SET
        .find_syntax_by_token(language)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(language))
}
