use lotlookup_core::Platform;

use super::*;
use crate::browser::scripted::{ScriptedDriver, ScriptedPage};

const BASE: &str = "https://www.iaai.com";

fn iaai_lot() -> LotIdentifier {
    LotIdentifier::new(Platform::Iaai, "987654").unwrap()
}

fn fast_timeouts() -> RenderTimeouts {
    RenderTimeouts {
        navigation: Duration::from_millis(200),
        render_wait: Duration::from_millis(50),
    }
}

/// An IAAI page with every profile locator populated.
fn full_iaai_page() -> ScriptedPage {
    let p = PageProfile::iaai(BASE);
    ScriptedPage::new()
        .with_text(&p.title, "2019 HONDA CIVIC EX")
        .with_text(&p.vin, " 2HGFC2F59KH000001 ")
        .with_text(&p.damage, "Front End")
        .with_text(&p.odometer, "45,210 mi\n(Actual)")
        .with_text(&p.auction_date, "Tue Oct 21, 10:00am CDT")
        .with_text(&p.location, "Dallas (TX)")
        .with_text(&p.sale_status, "Upcoming")
        .with_attribute(
            &p.gallery,
            &p.image_attr,
            &[
                "https://vis.iaai.com/resizer?imageKeys=vehicleimages/1.jpg",
                "https://cdn.example.com/banner.png",
                "https://vis.iaai.com/resizer?imageKeys=vehicleimages/2.jpg",
                "https://vis.iaai.com/resizer?imageKeys=vehicleimages/1.jpg",
            ],
        )
}

fn extractor(driver: &Arc<ScriptedDriver>) -> RenderedExtractor<ScriptedDriver> {
    RenderedExtractor::new(Arc::clone(driver), PageProfile::iaai(BASE), fast_timeouts())
}

#[tokio::test]
async fn extracts_every_field_from_a_rendered_page() {
    let driver = Arc::new(ScriptedDriver::new(full_iaai_page()));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.lot_number, "987654");
    assert_eq!(record.platform, Platform::Iaai);
    assert_eq!(record.year, Some(2019));
    assert_eq!(record.make.as_deref(), Some("HONDA"));
    assert_eq!(record.model.as_deref(), Some("CIVIC EX"));
    assert_eq!(record.vin.as_deref(), Some("2HGFC2F59KH000001"));
    assert_eq!(record.damage_description.as_deref(), Some("Front End"));
    assert_eq!(record.odometer.as_deref(), Some("45,210 mi (Actual)"));
    assert_eq!(
        record.auction_date.as_deref(),
        Some("Tue Oct 21, 10:00am CDT")
    );
    assert_eq!(record.auction_location.as_deref(), Some("Dallas (TX)"));
    assert_eq!(record.sale_status.as_deref(), Some("Upcoming"));
    assert_eq!(
        record.images,
        vec![
            "https://vis.iaai.com/resizer?imageKeys=vehicleimages/1.jpg".to_owned(),
            "https://vis.iaai.com/resizer?imageKeys=vehicleimages/2.jpg".to_owned(),
        ]
    );

    assert_eq!(
        driver.visited_urls(),
        vec!["https://www.iaai.com/VehicleDetails/987654".to_owned()]
    );
    assert_eq!(driver.open_sessions(), 0);
    assert_eq!(driver.graceful_closes(), 1);
}

#[tokio::test]
async fn missing_damage_field_is_absent_and_others_survive() {
    let p = PageProfile::iaai(BASE);
    // Same page, minus the damage element.
    let page = ScriptedPage::new()
        .with_text(&p.title, "2019 HONDA CIVIC EX")
        .with_text(&p.vin, "2HGFC2F59KH000001")
        .with_text(&p.odometer, "45,210 mi")
        .with_text(&p.auction_date, "Tue Oct 21")
        .with_text(&p.location, "Dallas (TX)")
        .with_text(&p.sale_status, "Upcoming")
        .with_attribute(
            &p.gallery,
            &p.image_attr,
            &["https://vis.iaai.com/vehicleimages/1.jpg"],
        );
    let driver = Arc::new(ScriptedDriver::new(page));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.damage_description, None);
    assert_eq!(record.year, Some(2019));
    assert_eq!(record.make.as_deref(), Some("HONDA"));
    assert_eq!(record.model.as_deref(), Some("CIVIC EX"));
    assert_eq!(record.vin.as_deref(), Some("2HGFC2F59KH000001"));
    assert_eq!(record.odometer.as_deref(), Some("45,210 mi"));
    assert_eq!(record.auction_date.as_deref(), Some("Tue Oct 21"));
    assert_eq!(record.auction_location.as_deref(), Some("Dallas (TX)"));
    assert_eq!(record.sale_status.as_deref(), Some("Upcoming"));
    assert_eq!(record.images.len(), 1);
}

#[tokio::test]
async fn failing_field_read_does_not_abort_extraction() {
    let p = PageProfile::iaai(BASE);
    let driver = Arc::new(ScriptedDriver::new(
        full_iaai_page()
            .with_failing_read(&p.vin)
            .with_failing_read(&p.gallery),
    ));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.vin, None);
    assert!(record.images.is_empty());
    assert_eq!(record.damage_description.as_deref(), Some("Front End"));
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn blank_field_text_is_absent() {
    let p = PageProfile::iaai(BASE);
    let driver = Arc::new(ScriptedDriver::new(
        ScriptedPage::new().with_text(&p.sale_status, "  \n "),
    ));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.sale_status, None);
}

#[tokio::test]
async fn empty_page_still_yields_identity() {
    let driver = Arc::new(ScriptedDriver::new(ScriptedPage::new()));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record, NormalizedRecord::empty(&iaai_lot()));
}

#[tokio::test]
async fn unparseable_title_is_kept_as_model() {
    let p = PageProfile::iaai(BASE);
    let driver = Arc::new(ScriptedDriver::new(
        ScriptedPage::new().with_text(&p.title, "Salvage Trailer"),
    ));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.year, None);
    assert_eq!(record.make, None);
    assert_eq!(record.model.as_deref(), Some("Salvage Trailer"));
}

#[tokio::test]
async fn marker_timeout_is_fatal_and_releases_session() {
    let driver = Arc::new(ScriptedDriver::new(
        full_iaai_page().with_marker_never_appearing(),
    ));

    let err = extractor(&driver).extract(&iaai_lot()).await.unwrap_err();

    assert!(
        matches!(err, RenderError::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
    assert_eq!(driver.sessions_opened(), 1);
    assert_eq!(driver.open_sessions(), 0);
    assert_eq!(driver.graceful_closes(), 1);
}

#[tokio::test]
async fn late_marker_within_deadline_succeeds() {
    let driver = Arc::new(ScriptedDriver::new(
        full_iaai_page().with_marker_after(Duration::from_millis(10)),
    ));

    let record = extractor(&driver).extract(&iaai_lot()).await.unwrap();

    assert_eq!(record.year, Some(2019));
}

#[tokio::test]
async fn navigation_timeout_is_a_render_timeout() {
    let driver = Arc::new(ScriptedDriver::new(
        full_iaai_page().with_navigation_delay(Duration::from_secs(5)),
    ));

    let err = extractor(&driver).extract(&iaai_lot()).await.unwrap_err();

    assert!(matches!(err, RenderError::Timeout { .. }));
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn navigation_failure_is_fatal_and_releases_session() {
    let driver = Arc::new(ScriptedDriver::new(
        full_iaai_page().with_navigation_error("net::ERR_NAME_NOT_RESOLVED"),
    ));

    let err = extractor(&driver).extract(&iaai_lot()).await.unwrap_err();

    assert!(
        matches!(
            err,
            RenderError::Navigation {
                source: DriverError::Navigation(_),
                ..
            }
        ),
        "expected Navigation, got: {err:?}"
    );
    assert_eq!(driver.open_sessions(), 0);
}

#[tokio::test]
async fn launch_failure_is_session_unavailable() {
    let driver = Arc::new(ScriptedDriver::failing_to_launch("no chromium on PATH"));

    let err = extractor(&driver).extract(&iaai_lot()).await.unwrap_err();

    assert!(matches!(err, RenderError::SessionUnavailable(_)));
    assert_eq!(driver.sessions_opened(), 0);
}

#[tokio::test]
async fn copart_profile_uses_copart_locators() {
    let p = PageProfile::copart("https://www.copart.com");
    let page = ScriptedPage::new()
        .with_text(&p.title, "2018 TOYOTA CAMRY SE")
        .with_attribute(
            &p.gallery,
            &p.image_attr,
            &["https://cs.copart.com/v1/AUTH/lpp/1.jpg"],
        );
    let driver = Arc::new(ScriptedDriver::new(page));
    let extractor = RenderedExtractor::new(Arc::clone(&driver), p, fast_timeouts());
    let lot = LotIdentifier::new(Platform::Copart, "12345678").unwrap();

    let record = extractor.extract(&lot).await.unwrap();

    assert_eq!(record.platform, Platform::Copart);
    assert_eq!(record.make.as_deref(), Some("TOYOTA"));
    assert_eq!(record.images.len(), 1);
    assert_eq!(
        driver.visited_urls(),
        vec!["https://www.copart.com/lot/12345678".to_owned()]
    );
}

#[test]
fn gallery_filter_keeps_first_occurrence_in_order() {
    let urls = vec![
        "https://a/vehicleimages/2.jpg".to_owned(),
        "https://a/logo.svg".to_owned(),
        " https://a/vehicleimages/1.jpg ".to_owned(),
        "https://a/vehicleimages/2.jpg".to_owned(),
    ];
    assert_eq!(
        filter_gallery(urls, "vehicleimages"),
        vec![
            "https://a/vehicleimages/2.jpg".to_owned(),
            "https://a/vehicleimages/1.jpg".to_owned(),
        ]
    );
}
