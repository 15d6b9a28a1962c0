//! Resolves caller input into a [`NormalizedRecord`].
//!
//! `resolve` classifies the input, dispatches to the extractor for the
//! resolved platform under one overall deadline, and translates every
//! component failure into a [`PipelineError`]. This module owns all of those
//! translations.

use std::sync::Arc;
use std::time::Duration;

use lotlookup_core::{
    classify_and_extract, AppConfig, CopartStrategy, IdentifierError, LotIdentifier,
    NormalizedRecord, Platform,
};

use crate::browser::BrowserDriver;
use crate::copart::CopartClient;
use crate::error::{CopartError, PipelineError, RenderError};
use crate::rendered::{PageProfile, RenderTimeouts, RenderedExtractor};
use crate::source::LotSource;

/// How Copart lots are fetched.
pub enum CopartSource<D: BrowserDriver> {
    Api(CopartClient),
    Rendered(RenderedExtractor<D>),
}

/// Pipeline coordinator: identifier extraction, dispatch, deadline, error taxonomy.
pub struct Pipeline<D: BrowserDriver> {
    copart: CopartSource<D>,
    iaai: RenderedExtractor<D>,
    deadline: Duration,
}

impl<D: BrowserDriver> Pipeline<D> {
    #[must_use]
    pub fn new(copart: CopartSource<D>, iaai: RenderedExtractor<D>, deadline: Duration) -> Self {
        Self {
            copart,
            iaai,
            deadline,
        }
    }

    /// Wires a pipeline from application config around `driver`.
    ///
    /// # Errors
    ///
    /// Returns [`CopartError`] if the Copart HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, driver: D) -> Result<Self, CopartError> {
        let driver = Arc::new(driver);
        let timeouts = RenderTimeouts {
            navigation: Duration::from_secs(config.navigation_timeout_secs),
            render_wait: Duration::from_secs(config.render_wait_secs),
        };

        let copart = match config.copart_strategy {
            CopartStrategy::Api => CopartSource::Api(CopartClient::new(
                &config.copart_base_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?),
            CopartStrategy::Rendered => CopartSource::Rendered(RenderedExtractor::new(
                Arc::clone(&driver),
                PageProfile::copart(&config.copart_base_url),
                timeouts,
            )),
        };
        let iaai = RenderedExtractor::new(
            driver,
            PageProfile::iaai(&config.iaai_base_url),
            timeouts,
        );

        Ok(Self::new(
            copart,
            iaai,
            Duration::from_secs(config.resolve_deadline_secs),
        ))
    }

    /// Resolves a bare lot number or listing URL into a normalized record.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] of the matching kind; see [`crate::ErrorKind`].
    pub async fn resolve(&self, input: &str) -> Result<NormalizedRecord, PipelineError> {
        let lot = classify_and_extract(input)?;
        tracing::info!(lot = %lot, "resolving lot");

        let result = match (lot.platform(), &self.copart) {
            (Platform::Copart, CopartSource::Api(client)) => self.run(client, &lot).await,
            (Platform::Copart, CopartSource::Rendered(extractor)) => {
                self.run(extractor, &lot).await
            }
            (Platform::Iaai, _) => self.run(&self.iaai, &lot).await,
        };

        match &result {
            Ok(_) => tracing::info!(lot = %lot, "lot resolved"),
            Err(e) => tracing::warn!(lot = %lot, kind = %e.kind(), error = %e, "lot resolution failed"),
        }
        result
    }

    async fn run<S>(&self, source: &S, lot: &LotIdentifier) -> Result<NormalizedRecord, PipelineError>
    where
        S: LotSource,
        PipelineError: From<S::Error>,
    {
        match tokio::time::timeout(self.deadline, source.fetch(lot)).await {
            Ok(result) => result.map_err(PipelineError::from),
            Err(_) => Err(PipelineError::RenderTimeout(format!(
                "lot {lot} was not extracted within {}s",
                self.deadline.as_secs_f64()
            ))),
        }
    }
}

impl From<IdentifierError> for PipelineError {
    fn from(err: IdentifierError) -> Self {
        match err {
            IdentifierError::Unrecognized { .. } => PipelineError::UnrecognizedInput(err.to_string()),
            IdentifierError::Malformed { .. } => PipelineError::MalformedIdentifier(err.to_string()),
        }
    }
}

impl From<CopartError> for PipelineError {
    fn from(err: CopartError) -> Self {
        match err {
            CopartError::LotNotFound { .. } => PipelineError::LotNotFound(err.to_string()),
            CopartError::Http(_)
            | CopartError::InvalidBaseUrl { .. }
            | CopartError::UnexpectedStatus { .. }
            | CopartError::Deserialize { .. }
            | CopartError::MalformedPayload { .. } => {
                PipelineError::UpstreamUnavailable(format!("copart: {err}"))
            }
        }
    }
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Timeout { .. } => PipelineError::RenderTimeout(err.to_string()),
            RenderError::SessionUnavailable(_) | RenderError::Navigation { .. } => {
                PipelineError::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
