//! Headless Chromium driver backed by `chromiumoxide`.
//!
//! Every session launches its own browser process with a single page, so
//! concurrent extractions never share browser state.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{BrowserDriver, BrowserSession, DriverError};

const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on a graceful shutdown before the process is killed.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Launch options for [`ChromiumDriver`].
#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Explicit Chromium binary; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    pub headless: bool,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
        }
    }
}

impl ChromiumConfig {
    #[must_use]
    pub fn from_app_config(config: &lotlookup_core::AppConfig) -> Self {
        Self {
            executable: config.browser_executable.clone(),
            headless: config.browser_headless,
        }
    }
}

/// Launches one Chromium process per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumDriver {
    config: ChromiumConfig,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, DriverError> {
        let mut builder = BrowserConfig::builder();
        if let Some(path) = &self.config.executable {
            builder = builder.chrome_executable(path);
        }
        if !self.config.headless {
            builder = builder.with_head();
        }
        builder.build().map_err(DriverError::Launch)
    }
}

impl BrowserDriver for ChromiumDriver {
    type Session = ChromiumSession;

    async fn open_session(&self) -> Result<ChromiumSession, DriverError> {
        let config = self.browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "chromium handler stopped");
                    break;
                }
            }
        });

        match browser.new_page("about:blank").await {
            Ok(page) => Ok(ChromiumSession {
                browser: Mutex::new(Some(browser)),
                page,
                handler_task,
            }),
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::debug!(error = %close_err, "failed to close browser after page error");
                }
                handler_task.abort();
                Err(DriverError::Launch(format!("could not open page: {e}")))
            }
        }
    }
}

/// One Chromium process and its single page.
pub struct ChromiumSession {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromiumSession {
    fn take_browser(&mut self) -> Option<Browser> {
        self.browser
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(DriverError::Navigation(e.to_string())),
            Err(_) => Err(DriverError::Timeout {
                what: format!("navigation to {url}"),
                after: timeout,
            }),
        }
    }

    async fn wait_for_marker(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let poll = async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(MARKER_POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| DriverError::Timeout {
                what: format!("marker \"{selector}\""),
                after: timeout,
            })
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>, DriverError> {
        // A failed lookup means no element matched.
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(None);
        };
        element.inner_text().await.map_err(|e| DriverError::Read {
            selector: selector.to_owned(),
            reason: e.to_string(),
        })
    }

    async fn read_all_attribute(
        &self,
        selector: &str,
        attr: &str,
    ) -> Result<Vec<String>, DriverError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| DriverError::Read {
                selector: selector.to_owned(),
                reason: e.to_string(),
            })?;

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            match element.attribute(attr).await {
                Ok(Some(value)) => values.push(value),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(selector, attr, error = %e, "skipping unreadable element attribute");
                }
            }
        }
        Ok(values)
    }

    async fn close(&mut self) {
        if let Some(mut browser) = self.take_browser() {
            match tokio::time::timeout(CLOSE_TIMEOUT, browser.close()).await {
                Ok(Ok(_)) => {
                    if tokio::time::timeout(CLOSE_TIMEOUT, browser.wait())
                        .await
                        .is_err()
                    {
                        tracing::debug!("chromium did not exit after close; killing");
                    }
                }
                Ok(Err(e)) => tracing::debug!(error = %e, "chromium close command failed"),
                Err(_) => tracing::debug!("chromium close timed out; killing"),
            }
            // Dropping the Browser kills the child process if it is still running.
            drop(browser);
        }
        self.handler_task.abort();
    }

    fn abort(&mut self) {
        drop(self.take_browser());
        self.handler_task.abort();
    }
}
