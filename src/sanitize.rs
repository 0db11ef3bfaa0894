use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_DATA_DIR: &str = "data";
const EXTENSION: &str = "json";
const TREND_PREFIX: &str = "trend_";

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static QUERY_DISALLOWED: OnceLock<Regex> = OnceLock::new();
static TREND_DISALLOWED: OnceLock<Regex> = OnceLock::new();
static UNDERSCORES: OnceLock<Regex> = OnceLock::new();

/// What the sanitized string came from. Queries keep `:` so operator syntax
/// like `min_faves:1000` stays readable in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Query,
    Trend,
}

impl NameKind {
    fn disallowed(&self) -> &'static Regex {
        match self {
            NameKind::Query => QUERY_DISALLOWED
                .get_or_init(|| Regex::new(r"[^a-z0-9_:]").expect("query allow-list regex")),
            NameKind::Trend => TREND_DISALLOWED
                .get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("trend allow-list regex")),
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            NameKind::Query => "",
            NameKind::Trend => TREND_PREFIX,
        }
    }
}

/// Lower-cases, turns whitespace runs and disallowed characters into single
/// underscores, and trims underscores off both ends.
pub fn sanitize(input: &str, kind: NameKind) -> String {
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    let underscores = UNDERSCORES.get_or_init(|| Regex::new(r"_+").expect("underscore regex"));

    let lowered = input.to_lowercase();
    let spaced = whitespace.replace_all(&lowered, "_");
    let allowed = kind.disallowed().replace_all(&spaced, "_");
    let collapsed = underscores.replace_all(&allowed, "_");
    collapsed.trim_matches('_').to_string()
}

/// `<stem>_<count>.json`, or `trend_<stem>_<count>.json` for trends. `None`
/// when nothing filesystem-safe is left of the input.
pub fn file_name(input: &str, count: usize, kind: NameKind) -> Option<String> {
    let stem = sanitize(input, kind);
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}{stem}_{count}.{EXTENSION}", kind.prefix()))
}

/// Same as [`file_name`], placed under `dir`. The directory itself is created
/// when the file is written.
pub fn output_path(dir: &Path, input: &str, count: usize, kind: NameKind) -> Option<PathBuf> {
    file_name(input, count, kind).map(|name| dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_colon() {
        assert_eq!(
            file_name(" Bitcoin  MIN_FAVES:1000 ", 10000, NameKind::Query).as_deref(),
            Some("bitcoin_min_faves:1000_10000.json")
        );
    }

    #[test]
    fn test_trend_drops_colon() {
        assert_eq!(sanitize("Time: 10:30", NameKind::Trend), "time_10_30");
        assert_eq!(
            file_name("#WorldCup 2026", 500, NameKind::Trend).as_deref(),
            Some("trend_worldcup_2026_500.json")
        );
    }

    #[test]
    fn test_special_characters_become_underscores() {
        assert_eq!(
            sanitize("\"Elon Musk\" -filter:replies (lang:en)", NameKind::Query),
            "elon_musk_filter:replies_lang:en"
        );
        assert_eq!(sanitize("a/b\\c", NameKind::Query), "a_b_c");
    }

    #[test]
    fn test_tabs_and_newlines_are_whitespace() {
        assert_eq!(sanitize("rust\t\nlang", NameKind::Query), "rust_lang");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            " Bitcoin  MIN_FAVES:1000 ",
            "__already_clean__",
            "Ünïcödé façade",
            "#tag @user $TSLA",
            "",
        ] {
            for kind in [NameKind::Query, NameKind::Trend] {
                let once = sanitize(input, kind);
                assert_eq!(sanitize(&once, kind), once, "input {input:?}");
            }
        }
    }

    #[test]
    fn test_deterministic_path() {
        let dir = Path::new(DEFAULT_DATA_DIR);
        let a = output_path(dir, "Rust Lang", 10, NameKind::Query);
        let b = output_path(dir, "Rust Lang", 10, NameKind::Query);
        assert_eq!(a, b);
        assert_eq!(a, Some(PathBuf::from("data/rust_lang_10.json")));
    }

    #[test]
    fn test_nothing_left() {
        assert_eq!(file_name("!!! ???", 10, NameKind::Trend), None);
        assert_eq!(file_name("   ", 10, NameKind::Query), None);
    }
}
