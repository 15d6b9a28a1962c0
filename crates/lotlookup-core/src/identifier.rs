//! Classifies raw caller input into a platform and extracts its canonical lot id.
//!
//! Classification is an ordered rule list. Copart is always evaluated before
//! IAAI, so an input that satisfies both (for example a redirect URL carrying
//! both domains) resolves to Copart.
//!
//! | Order | Rule | Platform |
//! |-------|------|----------|
//! | 1 | contains `copart.com`, or is exactly 8 digits | Copart |
//! | 2 | contains `iaai.com` | IAAI |
//!
//! A bare number only counts when it is the whole input; 8-digit runs inside
//! IAAI URLs or longer numbers do not make an input Copart.
//!
//! No I/O happens here.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{LotIdentifier, Platform};

pub const COPART_DOMAIN: &str = "copart.com";
pub const IAAI_DOMAIN: &str = "iaai.com";

// ASCII classes rather than `\d`, which would also accept non-ASCII digits.
static BARE_COPART_LOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("valid bare copart lot regex"));
static COPART_LOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8}").expect("valid copart lot regex"));
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid digit run regex"));

/// Errors produced while turning caller input into a [`LotIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input matches neither platform's grammar.
    #[error("unsupported or invalid input \"{input}\": expected a Copart or IAAI lot number or listing URL")]
    Unrecognized { input: String },

    /// The platform was recognized but no valid lot id could be extracted.
    #[error("malformed {platform} identifier in \"{input}\": {reason}")]
    Malformed {
        platform: Platform,
        input: String,
        reason: String,
    },
}

/// Decides which platform `input` belongs to, without extracting an id.
///
/// Surrounding whitespace is ignored. Returns `None` when no rule matches.
#[must_use]
pub fn classify(input: &str) -> Option<Platform> {
    let input = input.trim();
    if input.contains(COPART_DOMAIN) || BARE_COPART_LOT_RE.is_match(input) {
        Some(Platform::Copart)
    } else if input.contains(IAAI_DOMAIN) {
        Some(Platform::Iaai)
    } else {
        None
    }
}

/// Classifies `input` and extracts the canonical lot identifier.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// - [`IdentifierError::Unrecognized`] if no platform rule matches.
/// - [`IdentifierError::Malformed`] if the platform matched but the input
///   carries no usable lot id (a `copart.com` URL without an 8-digit run, or an
///   `iaai.com` URL whose last path segment has no digits).
pub fn classify_and_extract(input: &str) -> Result<LotIdentifier, IdentifierError> {
    let input = input.trim();
    match classify(input) {
        Some(Platform::Copart) => extract_copart(input),
        Some(Platform::Iaai) => extract_iaai(input),
        None => Err(IdentifierError::Unrecognized {
            input: input.to_owned(),
        }),
    }
}

fn extract_copart(input: &str) -> Result<LotIdentifier, IdentifierError> {
    let id = COPART_LOT_RE
        .find(input)
        .ok_or_else(|| IdentifierError::Malformed {
            platform: Platform::Copart,
            input: input.to_owned(),
            reason: "no 8-digit lot number found".to_owned(),
        })?;
    LotIdentifier::new(Platform::Copart, id.as_str())
}

fn extract_iaai(input: &str) -> Result<LotIdentifier, IdentifierError> {
    // rsplit always yields at least one item, even for an empty string.
    let last_segment = input.rsplit('/').next().unwrap_or_default();
    let id = DIGIT_RUN_RE
        .find(last_segment)
        .ok_or_else(|| IdentifierError::Malformed {
            platform: Platform::Iaai,
            input: input.to_owned(),
            reason: format!("no digits in final path segment \"{last_segment}\""),
        })?;
    LotIdentifier::new(Platform::Iaai, id.as_str())
}

#[cfg(test)]
#[path = "identifier_test.rs"]
mod tests;
