//! Per-platform locator sets for rendered lot pages.
//!
//! Selectors follow the public lot-detail markup of each site. When a site
//! changes its markup only the profile needs to change; the extraction
//! algorithm in [`super::RenderedExtractor`] is shared.

use lotlookup_core::{LotIdentifier, Platform};

/// Everything the rendered extractor needs to know about one platform's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProfile {
    pub platform: Platform,
    /// Site origin, e.g. `https://www.iaai.com`.
    pub base_url: String,
    /// Detail page path with an `{id}` placeholder.
    pub detail_path: String,
    /// Element whose presence means lot data has rendered.
    pub marker: String,
    /// Listing heading in `YEAR MAKE MODEL` form.
    pub title: String,
    pub vin: String,
    pub damage: String,
    pub odometer: String,
    pub auction_date: String,
    pub location: String,
    pub sale_status: String,
    /// Image elements inside the gallery container.
    pub gallery: String,
    pub image_attr: String,
    /// Substring every accepted image URL must contain.
    pub image_host: String,
}

impl PageProfile {
    /// Insurance Auto Auctions vehicle detail page.
    #[must_use]
    pub fn iaai(base_url: &str) -> Self {
        Self {
            platform: Platform::Iaai,
            base_url: base_url.to_owned(),
            detail_path: "/VehicleDetails/{id}".to_owned(),
            marker: "section.vehicle-information".to_owned(),
            title: "h1.heading-2".to_owned(),
            vin: ".data-list__item--vin .data-list__value".to_owned(),
            damage: ".data-list__item--primary-damage .data-list__value".to_owned(),
            odometer: ".data-list__item--odometer .data-list__value".to_owned(),
            auction_date: ".data-list__item--auction-date .data-list__value".to_owned(),
            location: ".data-list__item--selling-branch .data-list__value".to_owned(),
            sale_status: ".data-list__item--sale-status .data-list__value".to_owned(),
            gallery: ".vehicle-image__gallery img".to_owned(),
            image_attr: "src".to_owned(),
            image_host: "vehicleimages".to_owned(),
        }
    }

    /// Copart public lot page, used when the JSON endpoint is not an option.
    #[must_use]
    pub fn copart(base_url: &str) -> Self {
        Self {
            platform: Platform::Copart,
            base_url: base_url.to_owned(),
            detail_path: "/lot/{id}".to_owned(),
            marker: "#lot-details".to_owned(),
            title: "h1.title".to_owned(),
            vin: "[data-uname='lotdetailVinvalue']".to_owned(),
            damage: "[data-uname='lotdetailPrimarydamagevalue']".to_owned(),
            odometer: "[data-uname='lotdetailOdometervalue']".to_owned(),
            auction_date: "[data-uname='lotdetailSaleinformationsaledatevalue']".to_owned(),
            location: "[data-uname='lotdetailSaleinformationlocationvalue']".to_owned(),
            sale_status: "[data-uname='lotdetailSaleinformationsalestatusvalue']".to_owned(),
            gallery: ".image-galleria_wrap img".to_owned(),
            image_attr: "src".to_owned(),
            image_host: "copart.com".to_owned(),
        }
    }

    /// Detail page URL for `lot`.
    #[must_use]
    pub fn detail_url(&self, lot: &LotIdentifier) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.detail_path.replace("{id}", lot.id())
        )
    }
}
