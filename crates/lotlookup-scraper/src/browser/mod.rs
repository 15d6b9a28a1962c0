//! Headless-browser contract used by rendered-page extraction.
//!
//! A [`BrowserDriver`] hands out one [`BrowserSession`] (one page) per call.
//! Sessions are held through a [`SessionGuard`], which releases the session on
//! every exit path: [`SessionGuard::release`] closes it gracefully, and
//! dropping the guard without releasing it (deadline hit, caller cancelled)
//! aborts it synchronously.

#[cfg(feature = "browser")]
pub mod chromium;
#[cfg(any(test, feature = "test-support"))]
pub mod scripted;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Failures reported by a browser driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("timed out after {}ms waiting for {what}", .after.as_millis())]
    Timeout { what: String, after: Duration },

    #[error("failed to read \"{selector}\": {reason}")]
    Read { selector: String, reason: String },
}

/// Opens browser sessions.
pub trait BrowserDriver: Send + Sync {
    type Session: BrowserSession;

    fn open_session(&self) -> impl Future<Output = Result<Self::Session, DriverError>> + Send;
}

/// One open page in a headless browser.
pub trait BrowserSession: Send + Sync {
    /// Navigates to `url`, failing with [`DriverError::Timeout`] after `timeout`.
    fn navigate(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Waits until `selector` matches an element, or `timeout` elapses.
    fn wait_for_marker(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Text of the first element matching `selector`, `None` if nothing matches.
    fn read_text(
        &self,
        selector: &str,
    ) -> impl Future<Output = Result<Option<String>, DriverError>> + Send;

    /// Values of `attr` across every element matching `selector`, in document order.
    fn read_all_attribute(
        &self,
        selector: &str,
        attr: &str,
    ) -> impl Future<Output = Result<Vec<String>, DriverError>> + Send;

    /// Gracefully closes the session. Must be idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;

    /// Releases the session without awaiting. Called when a guard is dropped
    /// before [`SessionGuard::release`]. Must be idempotent.
    fn abort(&mut self);
}

/// Scoped ownership of a [`BrowserSession`].
pub struct SessionGuard<S: BrowserSession> {
    session: S,
    released: bool,
}

impl<S: BrowserSession> SessionGuard<S> {
    #[must_use]
    pub fn new(session: S) -> Self {
        Self {
            session,
            released: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Gracefully closes the held session.
    pub async fn release(mut self) {
        self.session.close().await;
        self.released = true;
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if !self.released {
            tracing::debug!("browser session dropped before release; aborting");
            self.session.abort();
        }
    }
}
