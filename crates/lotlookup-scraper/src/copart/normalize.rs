//! Maps the Copart lot-detail `data` object onto a [`NormalizedRecord`].
//!
//! ## Observed shape
//!
//! ```json
//! {
//!   "lotNumber": 12345678,
//!   "vin": "1HGCM82633A004352",
//!   "saleLocation": "CA - SACRAMENTO",
//!   "odometerReading": 123456,
//!   "auctionDate": 1729094400000,
//!   "vehicleDetails": { "year": 2003, "make": "HONDA", "model": "ACCORD" },
//!   "lotDetails": { "damageDescription": "FRONT END", "saleStatus": "PURE SALE" },
//!   "imagesList": [ { "url": "https://cs.copart.com/...jpg" } ]
//! }
//! ```
//!
//! Scalars show up as either JSON strings or numbers depending on the lot, so
//! every leaf is read leniently. Any missing or oddly typed leaf becomes an
//! absent field; nothing here can fail.

use lotlookup_core::{LotIdentifier, NormalizedRecord};
use serde_json::Value;

/// Builds a record from the `data` object of a lot-detail response.
#[must_use]
pub fn normalize_lot(lot: &LotIdentifier, data: &Value) -> NormalizedRecord {
    let mut record = NormalizedRecord::empty(lot);

    record.year = int_at(data, "/vehicleDetails/year");
    record.make = text_at(data, "/vehicleDetails/make");
    record.model = text_at(data, "/vehicleDetails/model");
    record.vin = text_at(data, "/vin");
    record.damage_description = text_at(data, "/lotDetails/damageDescription");
    record.odometer = text_at(data, "/odometerReading");
    record.auction_location = text_at(data, "/saleLocation");
    record.auction_date = text_at(data, "/auctionDate");
    record.sale_status = text_at(data, "/lotDetails/saleStatus");
    record.images = data
        .get("imagesList")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|img| text_at(img, "/url")).collect())
        .unwrap_or_default();

    record
}

/// Non-empty text at `pointer`; numbers are rendered as their JSON text.
fn text_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int_at(value: &Value, pointer: &str) -> Option<i32> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
