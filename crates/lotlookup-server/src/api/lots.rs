use axum::{
    extract::{Query, State},
    Extension, Json,
};
use lotlookup_core::NormalizedRecord;
use lotlookup_scraper::BrowserDriver;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_pipeline_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct VehicleDataQuery {
    pub lot: Option<String>,
    pub url: Option<String>,
}

impl VehicleDataQuery {
    /// `lot` wins over `url`; blank values count as missing.
    fn input(&self) -> Option<&str> {
        [self.lot.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

pub(super) async fn get_vehicle_data<D: BrowserDriver + 'static>(
    State(state): State<AppState<D>>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VehicleDataQuery>,
) -> Result<Json<ApiResponse<NormalizedRecord>>, ApiError> {
    let Some(input) = query.input() else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "either the `lot` or the `url` query parameter is required",
        ));
    };

    let _permit = state.permits.acquire().await.map_err(|_| {
        ApiError::new(req_id.0.clone(), "internal_error", "resolver is shutting down")
    })?;

    let record = state
        .pipeline
        .resolve(input)
        .await
        .map_err(|e| map_pipeline_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: record,
        meta: ResponseMeta::new(req_id.0),
    }))
}
