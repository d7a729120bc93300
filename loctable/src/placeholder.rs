//! Placeholder lexing and comparison utilities.
//!
//! Two placeholder families are recognized:
//! - named: `~function(args)`, e.g. `~plural(item|items)`;
//! - unnamed: printf-style tokens (`%s`, `%d`, `%.2f`, ...) and angle-bracket tags (`<b>`).
//!
//! Placeholders are compared per string without regard to their order of appearance.

use std::{borrow::Cow, collections::BTreeSet, fmt};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref NAMED_FORMAT_REGEX: Regex = Regex::new(r"~([a-z]+)\(([^)]*)\)").unwrap();
    static ref UNNAMED_FORMAT_REGEX: Regex =
        Regex::new(r"<[^-=< ][^>]*>|%ls|%s|%S|%i|%I|%u|%d|%[0-9.]*f|%\.\*f").unwrap();
    static ref ENGLISH_WORD_REGEX: Regex = Regex::new(r"[A-Za-z]+").unwrap();
}

/// The two-character escape used for line breaks inside values.
pub const NEWLINE_ESCAPE: &str = r"\n";

const BRANCH_SEPARATOR: char = '|';

/// A `~function(args)` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NamedFormat {
    pub function: String,
    pub args: String,
}

impl NamedFormat {
    pub fn new(function: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: args.into(),
        }
    }

    /// The collapsed form of a two-branch placeholder: same function, first branch only.
    ///
    /// `~plural(one|many)` collapses to `~plural(one)`; anything without exactly one
    /// `|` has no default form.
    pub fn default_form(&self) -> Option<NamedFormat> {
        let mut branches = self.args.split(BRANCH_SEPARATOR);
        let first = branches.next()?;
        match (branches.next(), branches.next()) {
            (Some(_), None) => Some(NamedFormat::new(self.function.clone(), first)),
            _ => None,
        }
    }
}

impl fmt::Display for NamedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}({})", self.function, self.args)
    }
}

/// A placeholder found in a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatToken {
    Named(NamedFormat),
    Unnamed(String),
}

impl FormatToken {
    /// The literal text the token was parsed from.
    pub fn source_text(&self) -> Cow<'_, str> {
        match self {
            FormatToken::Named(named) => Cow::Owned(named.to_string()),
            FormatToken::Unnamed(raw) => Cow::Borrowed(raw),
        }
    }
}

/// Named placeholders of `value`, as a set.
pub fn named_formats(value: &str) -> BTreeSet<NamedFormat> {
    NAMED_FORMAT_REGEX
        .captures_iter(value)
        .map(|caps| NamedFormat::new(&caps[1], &caps[2]))
        .collect()
}

/// Unnamed placeholders of `value`, in order of appearance.
pub fn unnamed_formats(value: &str) -> Vec<String> {
    UNNAMED_FORMAT_REGEX
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Unnamed placeholders of `value`, sorted. Order of appearance is irrelevant,
/// repetitions count.
pub fn sorted_unnamed_formats(value: &str) -> Vec<String> {
    let mut formats = unnamed_formats(value);
    formats.sort();
    formats
}

/// All placeholders of `value`: unnamed ones first, then named ones.
pub fn tokens(value: &str) -> Vec<FormatToken> {
    unnamed_formats(value)
        .into_iter()
        .map(FormatToken::Unnamed)
        .chain(named_formats(value).into_iter().map(FormatToken::Named))
        .collect()
}

/// Whether a translation keeps the named placeholders of the original.
///
/// Identical sets are equal. Otherwise every placeholder missing from `translated`
/// must be a two-branch placeholder whose default form is present in `translated`.
pub fn is_named_format_equals(
    original: &BTreeSet<NamedFormat>,
    translated: &BTreeSet<NamedFormat>,
) -> bool {
    if original == translated {
        return true;
    }
    original.difference(translated).all(|missing| {
        missing
            .default_form()
            .is_some_and(|collapsed| translated.contains(&collapsed))
    })
}

/// Whether two strings carry compatible placeholders: the same unnamed
/// placeholders (in any order) and equivalent named sets.
pub fn formats_equivalent(original: &str, other: &str) -> bool {
    sorted_unnamed_formats(original) == sorted_unnamed_formats(other)
        && is_named_format_equals(&named_formats(original), &named_formats(other))
}

/// Replaces every occurrence of each token's literal text with a single space.
pub fn text_without_formats(value: &str, tokens: &[FormatToken]) -> String {
    tokens.iter().fold(value.to_string(), |text, token| {
        text.replace(token.source_text().as_ref(), " ")
    })
}

/// Text with the newline escape and all given placeholders blanked out.
pub fn clean_text(value: &str, tokens: &[FormatToken]) -> String {
    text_without_formats(&value.replace(NEWLINE_ESCAPE, " "), tokens)
}

/// ASCII-letter words of `value`, newline escapes treated as spaces.
pub fn english_words(value: &str) -> BTreeSet<String> {
    let text = value.replace(NEWLINE_ESCAPE, " ");
    ENGLISH_WORD_REGEX
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Renders a set of named placeholders as `~a(x), ~b(y)`.
pub fn render_named(formats: &BTreeSet<NamedFormat>) -> String {
    formats
        .iter()
        .map(NamedFormat::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders unnamed placeholders as `%d, %s`.
pub fn render_unnamed(formats: &[String]) -> String {
    formats.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(items: &[(&str, &str)]) -> BTreeSet<NamedFormat> {
        items
            .iter()
            .map(|(function, args)| NamedFormat::new(*function, *args))
            .collect()
    }

    #[test]
    fn test_named_formats() {
        let formats = named_formats("You have ~plural(item|items) from ~name(|) and ~name(|)");
        assert_eq!(formats, named(&[("plural", "item|items"), ("name", "|")]));
    }

    #[test]
    fn test_named_format_requires_lowercase_function() {
        assert!(named_formats("~Name(x) ~(x) ~na1me(x)").is_empty());
    }

    #[test]
    fn test_unnamed_printf_catalogue() {
        let found = unnamed_formats("%ls %s %S %i %I %u %d %f %.2f %10.3f %.*f");
        assert_eq!(
            found,
            vec!["%ls", "%s", "%S", "%i", "%I", "%u", "%d", "%f", "%.2f", "%10.3f", "%.*f"]
        );
    }

    #[test]
    fn test_unnamed_tags() {
        let found = unnamed_formats("<b>Bold</b> <-not> <=not> < not> <EM>");
        assert_eq!(found, vec!["<b>", "</b>", "<EM>"]);
    }

    #[test]
    fn test_sorted_unnamed_formats() {
        assert_eq!(sorted_unnamed_formats("%s then %d then %s"), vec!["%d", "%s", "%s"]);
    }

    #[test]
    fn test_unknown_printf_tokens_ignored() {
        assert!(unnamed_formats("100% %x %lu").is_empty());
    }

    #[test]
    fn test_named_equality_identical() {
        let set = named(&[("plural", "one|many")]);
        assert!(is_named_format_equals(&set, &set));
    }

    #[test]
    fn test_named_equality_default_form_collapse() {
        let original = named(&[("plural", "one|many")]);
        let collapsed = named(&[("plural", "one")]);
        assert!(is_named_format_equals(&original, &collapsed));
    }

    #[test]
    fn test_named_equality_collapse_must_keep_first_branch() {
        let original = named(&[("plural", "one|many")]);
        let other = named(&[("plural", "two|many")]);
        assert!(!is_named_format_equals(&original, &other));
        assert!(!is_named_format_equals(&original, &named(&[("plural", "many")])));
    }

    #[test]
    fn test_named_equality_three_branches_never_collapse() {
        let original = named(&[("select", "a|b|c")]);
        assert!(!is_named_format_equals(&original, &named(&[("select", "a")])));
    }

    #[test]
    fn test_named_equality_extra_translated_token_is_tolerated() {
        let original = named(&[("name", "x")]);
        let translated = named(&[("name", "x"), ("gender", "m|f")]);
        assert!(is_named_format_equals(&original, &translated));
    }

    #[test]
    fn test_named_equality_dropped_placeholder_is_not_collapse() {
        // A collapse keeps the first branch; dropping the placeholder entirely does not.
        let plural = named(&[("plural", "one|many")]);
        assert!(!is_named_format_equals(&plural, &BTreeSet::new()));
        assert!(!formats_equivalent("~plural(one|many) left", "left"));
        assert!(formats_equivalent("~plural(one|many) left", "~plural(one) left"));
    }

    #[test]
    fn test_default_form() {
        assert_eq!(
            NamedFormat::new("plural", "one|many").default_form(),
            Some(NamedFormat::new("plural", "one"))
        );
        assert_eq!(
            NamedFormat::new("name", "|").default_form(),
            Some(NamedFormat::new("name", ""))
        );
        assert_eq!(NamedFormat::new("name", "x").default_form(), None);
    }

    #[test]
    fn test_formats_equivalent() {
        assert!(formats_equivalent("Score: %d pts", "Score: %d"));
        assert!(!formats_equivalent("Level %d of %d", "Level %d of %s"));
        assert!(!formats_equivalent("Level %d of %d", "Level %d"));
        assert!(formats_equivalent("%s and %d", "%d і %s"));
        assert!(!formats_equivalent("~name(x) %s", "%s"));
    }

    #[test]
    fn test_text_without_formats() {
        let value = "Hit %d <b>enemies</b> with ~weapon(gun)";
        let cleaned = text_without_formats(value, &tokens(value));
        assert_eq!(cleaned, "Hit    enemies  with  ");
    }

    #[test]
    fn test_clean_text_and_english_words() {
        let value = r"Press\nStart %s";
        let cleaned = clean_text(value, &tokens(value));
        assert_eq!(cleaned, "Press Start  ");
        let words = english_words(&cleaned);
        assert_eq!(
            words.into_iter().collect::<Vec<_>>(),
            vec!["Press".to_string(), "Start".to_string()]
        );
    }

    #[test]
    fn test_english_words_skip_non_ascii() {
        let words = english_words(r"Привіт\nOK world");
        assert_eq!(words.len(), 2);
        assert!(words.contains("OK") && words.contains("world"));
    }

    #[test]
    fn test_render_named() {
        let set = named(&[("a", "x"), ("b", "y|z")]);
        assert_eq!(render_named(&set), "~a(x), ~b(y|z)");
        assert_eq!(render_named(&BTreeSet::new()), "");
    }

    #[test]
    fn test_source_text() {
        assert_eq!(
            FormatToken::Named(NamedFormat::new("f", "a")).source_text(),
            "~f(a)"
        );
        assert_eq!(FormatToken::Unnamed("%d".to_string()).source_text(), "%d");
    }
}
