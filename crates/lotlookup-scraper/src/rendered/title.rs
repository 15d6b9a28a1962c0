//! Parsing of listing titles shaped like `"2019 HONDA CIVIC EX"`.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]{4})\s+(\S+)\s+(.+?)\s*$").expect("valid listing title regex")
});

/// Year, make and model recovered from a listing title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTitle {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
}

/// Splits a `YEAR MAKE MODEL` title into its parts.
///
/// Titles that do not fit the pattern keep the whole trimmed text as the
/// model, leaving year and make absent.
#[must_use]
pub fn parse_title(title: &str) -> ParsedTitle {
    if let Some(caps) = TITLE_RE.captures(title) {
        return ParsedTitle {
            year: caps[1].parse().ok(),
            make: Some(caps[2].to_owned()),
            model: Some(caps[3].to_owned()),
        };
    }

    let trimmed = title.trim();
    ParsedTitle {
        year: None,
        make: None,
        model: (!trimmed.is_empty()).then(|| trimmed.to_owned()),
    }
}
