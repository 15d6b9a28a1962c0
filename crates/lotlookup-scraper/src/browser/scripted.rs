//! In-memory browser driver that replays a scripted page.
//!
//! Counts sessions as they are opened, closed, and aborted so tests can prove
//! that no session outlives an extraction.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::{BrowserDriver, BrowserSession, DriverError};

#[derive(Debug, Clone, Copy, Default)]
enum Marker {
    #[default]
    Present,
    AppearsAfter(Duration),
    Never,
}

/// Static description of what the scripted page contains.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    marker: Marker,
    navigation_error: Option<String>,
    navigation_delay: Duration,
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), Vec<String>>,
    failing_reads: HashSet<String>,
}

impl ScriptedPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_owned(), text.to_owned());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, selector: &str, attr: &str, values: &[&str]) -> Self {
        self.attributes.insert(
            (selector.to_owned(), attr.to_owned()),
            values.iter().map(|v| (*v).to_owned()).collect(),
        );
        self
    }

    /// Makes every read against `selector` fail with [`DriverError::Read`].
    #[must_use]
    pub fn with_failing_read(mut self, selector: &str) -> Self {
        self.failing_reads.insert(selector.to_owned());
        self
    }

    #[must_use]
    pub fn with_marker_after(mut self, delay: Duration) -> Self {
        self.marker = Marker::AppearsAfter(delay);
        self
    }

    #[must_use]
    pub fn with_marker_never_appearing(mut self) -> Self {
        self.marker = Marker::Never;
        self
    }

    #[must_use]
    pub fn with_navigation_error(mut self, reason: &str) -> Self {
        self.navigation_error = Some(reason.to_owned());
        self
    }

    #[must_use]
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    open: AtomicUsize,
    opened: AtomicUsize,
    graceful: AtomicUsize,
    aborted: AtomicUsize,
    visited: Mutex<Vec<String>>,
}

/// Driver whose sessions all show the same [`ScriptedPage`].
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    page: Arc<ScriptedPage>,
    counters: Arc<Counters>,
    launch_error: Option<String>,
}

impl ScriptedDriver {
    #[must_use]
    pub fn new(page: ScriptedPage) -> Self {
        Self {
            page: Arc::new(page),
            counters: Arc::new(Counters::default()),
            launch_error: None,
        }
    }

    /// A driver whose every `open_session` call fails.
    #[must_use]
    pub fn failing_to_launch(reason: &str) -> Self {
        Self {
            launch_error: Some(reason.to_owned()),
            ..Self::new(ScriptedPage::new())
        }
    }

    /// Sessions currently open (opened and neither closed nor aborted).
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn graceful_closes(&self) -> usize {
        self.counters.graceful.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn aborts(&self) -> usize {
        self.counters.aborted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn visited_urls(&self) -> Vec<String> {
        self.counters
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BrowserDriver for ScriptedDriver {
    type Session = ScriptedSession;

    async fn open_session(&self) -> Result<ScriptedSession, DriverError> {
        if let Some(reason) = &self.launch_error {
            return Err(DriverError::Launch(reason.clone()));
        }
        self.counters.open.fetch_add(1, Ordering::SeqCst);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            page: Arc::clone(&self.page),
            counters: Arc::clone(&self.counters),
            open: true,
        })
    }
}

#[derive(Debug)]
pub struct ScriptedSession {
    page: Arc<ScriptedPage>,
    counters: Arc<Counters>,
    open: bool,
}

impl ScriptedSession {
    fn mark_released(&mut self, counter: &AtomicUsize) {
        if self.open {
            self.open = false;
            self.counters.open.fetch_sub(1, Ordering::SeqCst);
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn check_read(&self, selector: &str) -> Result<(), DriverError> {
        if self.page.failing_reads.contains(selector) {
            return Err(DriverError::Read {
                selector: selector.to_owned(),
                reason: "scripted read failure".to_owned(),
            });
        }
        Ok(())
    }
}

impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        self.counters
            .visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());

        if self.page.navigation_delay > timeout {
            tokio::time::sleep(timeout).await;
            return Err(DriverError::Timeout {
                what: format!("navigation to {url}"),
                after: timeout,
            });
        }
        tokio::time::sleep(self.page.navigation_delay).await;

        match &self.page.navigation_error {
            Some(reason) => Err(DriverError::Navigation(reason.clone())),
            None => Ok(()),
        }
    }

    async fn wait_for_marker(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let appears_after = match self.page.marker {
            Marker::Present => Some(Duration::ZERO),
            Marker::AppearsAfter(delay) if delay <= timeout => Some(delay),
            Marker::AppearsAfter(_) | Marker::Never => None,
        };

        if let Some(delay) = appears_after {
            tokio::time::sleep(delay).await;
            return Ok(());
        }

        tokio::time::sleep(timeout).await;
        Err(DriverError::Timeout {
            what: format!("marker \"{selector}\""),
            after: timeout,
        })
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>, DriverError> {
        self.check_read(selector)?;
        Ok(self.page.texts.get(selector).cloned())
    }

    async fn read_all_attribute(
        &self,
        selector: &str,
        attr: &str,
    ) -> Result<Vec<String>, DriverError> {
        self.check_read(selector)?;
        Ok(self
            .page
            .attributes
            .get(&(selector.to_owned(), attr.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&mut self) {
        let counters = Arc::clone(&self.counters);
        self.mark_released(&counters.graceful);
    }

    fn abort(&mut self) {
        let counters = Arc::clone(&self.counters);
        self.mark_released(&counters.aborted);
    }
}
