//! Rendered-page lot extraction.
//!
//! Errors are split into two tiers:
//!
//! - **Fatal**: opening the session, navigating, and waiting for the marker
//!   element. Any failure here aborts the extraction with a [`RenderError`].
//! - **Best effort**: every field read after the marker appeared. A missing
//!   element or a failed read leaves that field absent and is only logged.

mod profile;
mod title;

use std::sync::Arc;
use std::time::Duration;

use lotlookup_core::{LotIdentifier, NormalizedRecord};

use crate::browser::{BrowserDriver, BrowserSession, DriverError, SessionGuard};
use crate::error::RenderError;
use crate::source::LotSource;

pub use profile::PageProfile;
pub use title::{parse_title, ParsedTitle};

/// Deadlines for the fatal tier of a rendered extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimeouts {
    pub navigation: Duration,
    pub render_wait: Duration,
}

impl Default for RenderTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(60),
            render_wait: Duration::from_secs(15),
        }
    }
}

/// Extracts lots by walking a rendered detail page, driven by a [`PageProfile`].
pub struct RenderedExtractor<D: BrowserDriver> {
    driver: Arc<D>,
    profile: PageProfile,
    timeouts: RenderTimeouts,
}

impl<D: BrowserDriver> RenderedExtractor<D> {
    #[must_use]
    pub fn new(driver: Arc<D>, profile: PageProfile, timeouts: RenderTimeouts) -> Self {
        Self {
            driver,
            profile,
            timeouts,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &PageProfile {
        &self.profile
    }

    /// Opens one session, walks the lot's detail page, and releases the session.
    ///
    /// # Errors
    ///
    /// - [`RenderError::SessionUnavailable`] if no browser session could be opened.
    /// - [`RenderError::Navigation`] if the page could not be loaded.
    /// - [`RenderError::Timeout`] if navigation or the marker wait ran out of time.
    pub async fn extract(&self, lot: &LotIdentifier) -> Result<NormalizedRecord, RenderError> {
        let url = self.profile.detail_url(lot);
        let session = self
            .driver
            .open_session()
            .await
            .map_err(RenderError::SessionUnavailable)?;

        let guard = SessionGuard::new(session);
        let outcome = self.walk(guard.session(), lot, &url).await;
        guard.release().await;
        outcome
    }

    async fn walk(
        &self,
        session: &D::Session,
        lot: &LotIdentifier,
        url: &str,
    ) -> Result<NormalizedRecord, RenderError> {
        tracing::debug!(lot = %lot, url, "navigating to lot page");
        session
            .navigate(url, self.timeouts.navigation)
            .await
            .map_err(|e| fatal(url, e))?;

        session
            .wait_for_marker(&self.profile.marker, self.timeouts.render_wait)
            .await
            .map_err(|e| fatal(url, e))?;

        Ok(self.read_record(session, lot).await)
    }

    async fn read_record(&self, session: &D::Session, lot: &LotIdentifier) -> NormalizedRecord {
        let p = &self.profile;
        let mut record = NormalizedRecord::empty(lot);

        if let Some(title) = read_field(session, lot, "title", &p.title).await {
            let parsed = parse_title(&title);
            record.year = parsed.year;
            record.make = parsed.make;
            record.model = parsed.model;
        }
        record.vin = read_field(session, lot, "vin", &p.vin).await;
        record.damage_description = read_field(session, lot, "damage", &p.damage).await;
        record.odometer = read_field(session, lot, "odometer", &p.odometer).await;
        record.auction_date = read_field(session, lot, "auction_date", &p.auction_date).await;
        record.auction_location = read_field(session, lot, "location", &p.location).await;
        record.sale_status = read_field(session, lot, "sale_status", &p.sale_status).await;
        record.images = self.read_images(session, lot).await;

        record
    }

    async fn read_images(&self, session: &D::Session, lot: &LotIdentifier) -> Vec<String> {
        let p = &self.profile;
        match session.read_all_attribute(&p.gallery, &p.image_attr).await {
            Ok(urls) => filter_gallery(urls, &p.image_host),
            Err(e) => {
                tracing::warn!(lot = %lot, selector = %p.gallery, error = %e, "gallery read failed; returning no images");
                Vec::new()
            }
        }
    }
}

impl<D: BrowserDriver> LotSource for RenderedExtractor<D> {
    type Error = RenderError;

    async fn fetch(&self, lot: &LotIdentifier) -> Result<NormalizedRecord, RenderError> {
        self.extract(lot).await
    }
}

fn fatal(url: &str, error: DriverError) -> RenderError {
    match error {
        DriverError::Timeout { after, .. } => RenderError::Timeout {
            url: url.to_owned(),
            waited: after,
        },
        other => RenderError::Navigation {
            url: url.to_owned(),
            source: other,
        },
    }
}

async fn read_field<S: BrowserSession>(
    session: &S,
    lot: &LotIdentifier,
    field: &'static str,
    selector: &str,
) -> Option<String> {
    match session.read_text(selector).await {
        Ok(Some(text)) => {
            let cleaned = collapse_whitespace(&text);
            (!cleaned.is_empty()).then_some(cleaned)
        }
        Ok(None) => {
            tracing::debug!(lot = %lot, field, selector, "field not present on page");
            None
        }
        Err(e) => {
            tracing::warn!(lot = %lot, field, selector, error = %e, "field read failed; leaving it absent");
            None
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps URLs served from `image_host`, dropping repeats but preserving order.
fn filter_gallery(urls: Vec<String>, image_host: &str) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        let url = url.trim().to_owned();
        if url.contains(image_host) && !kept.contains(&url) {
            kept.push(url);
        }
    }
    kept
}

#[cfg(test)]
#[path = "../rendered_test.rs"]
mod tests;
