use std::future::Future;

use lotlookup_core::{LotIdentifier, NormalizedRecord};

/// A platform-specific way of turning a [`LotIdentifier`] into a [`NormalizedRecord`].
///
/// Implementations report failures in their own error type; the pipeline
/// translates them into [`crate::PipelineError`].
pub trait LotSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(
        &self,
        lot: &LotIdentifier,
    ) -> impl Future<Output = Result<NormalizedRecord, Self::Error>> + Send;
}
