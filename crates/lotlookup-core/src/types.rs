//! Shared domain types for vehicle auction lot lookups.
//!
//! ## Record shape
//!
//! Every field of [`NormalizedRecord`] is serialized even when the source could
//! not supply it: absent values become JSON `null` and a missing gallery is an
//! empty array. Only `lot_number` and `platform` are guaranteed to carry data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::IdentifierError;

/// Length of a Copart lot number.
pub const COPART_LOT_LEN: usize = 8;

/// Auction platform a lot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Copart, served by a structured JSON endpoint.
    Copart,
    /// Insurance Auto Auctions, served as a client-rendered page.
    Iaai,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Copart => "copart",
            Platform::Iaai => "iaai",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, platform-qualified lot identifier.
///
/// Only constructible through [`LotIdentifier::new`], which enforces the
/// platform's identifier grammar: Copart ids are exactly eight ASCII digits,
/// IAAI ids are a non-empty run of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LotIdentifier {
    platform: Platform,
    id: String,
}

impl LotIdentifier {
    /// Builds an identifier after checking `id` against the platform grammar.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Malformed`] when `id` does not fit the grammar.
    pub fn new(platform: Platform, id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        let all_digits = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
        let valid = match platform {
            Platform::Copart => all_digits && id.len() == COPART_LOT_LEN,
            Platform::Iaai => all_digits,
        };

        if !valid {
            return Err(IdentifierError::Malformed {
                platform,
                input: id,
                reason: "identifier does not match the platform lot number format".to_owned(),
            });
        }

        Ok(Self { platform, id })
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for LotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.id)
    }
}

/// Platform-independent description of a single auction lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Canonical lot id, as resolved from the caller's input.
    pub lot_number: String,
    /// Which extractor produced this record.
    pub platform: Platform,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub vin: Option<String>,
    pub damage_description: Option<String>,
    /// Raw odometer text; the unit is whatever the source printed.
    pub odometer: Option<String>,
    pub auction_location: Option<String>,
    /// Raw auction date; no format is guaranteed.
    pub auction_date: Option<String>,
    pub sale_status: Option<String>,
    /// Image URLs in listing order.
    pub images: Vec<String>,
}

impl NormalizedRecord {
    /// Creates a record for `lot` with every optional field absent.
    #[must_use]
    pub fn empty(lot: &LotIdentifier) -> Self {
        Self {
            lot_number: lot.id().to_owned(),
            platform: lot.platform(),
            year: None,
            make: None,
            model: None,
            vin: None,
            damage_description: None,
            odometer: None,
            auction_location: None,
            auction_date: None,
            sale_status: None,
            images: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copart_identifier_requires_eight_digits() {
        assert!(LotIdentifier::new(Platform::Copart, "12345678").is_ok());
        assert!(LotIdentifier::new(Platform::Copart, "1234567").is_err());
        assert!(LotIdentifier::new(Platform::Copart, "123456789").is_err());
        assert!(LotIdentifier::new(Platform::Copart, "1234567a").is_err());
    }

    #[test]
    fn iaai_identifier_accepts_any_digit_run() {
        let lot = LotIdentifier::new(Platform::Iaai, "987654").expect("valid iaai id");
        assert_eq!(lot.platform(), Platform::Iaai);
        assert_eq!(lot.id(), "987654");
        assert!(LotIdentifier::new(Platform::Iaai, "").is_err());
        assert!(LotIdentifier::new(Platform::Iaai, "98-76").is_err());
    }

    #[test]
    fn empty_record_serializes_every_field() {
        let lot = LotIdentifier::new(Platform::Iaai, "42").unwrap();
        let json = serde_json::to_value(NormalizedRecord::empty(&lot)).unwrap();
        let obj = json.as_object().expect("record serializes to an object");

        for key in [
            "lot_number",
            "platform",
            "year",
            "make",
            "model",
            "vin",
            "damage_description",
            "odometer",
            "auction_location",
            "auction_date",
            "sale_status",
            "images",
        ] {
            assert!(obj.contains_key(key), "missing key {key} in {json}");
        }
        assert_eq!(json["lot_number"], "42");
        assert_eq!(json["platform"], "iaai");
        assert!(json["vin"].is_null());
        assert_eq!(json["images"], serde_json::json!([]));
    }

    #[test]
    fn lot_identifier_display_includes_platform() {
        let lot = LotIdentifier::new(Platform::Copart, "12345678").unwrap();
        assert_eq!(lot.to_string(), "copart:12345678");
    }
}
