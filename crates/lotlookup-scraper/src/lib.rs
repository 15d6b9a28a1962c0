pub mod browser;
pub mod copart;
pub mod error;
pub mod pipeline;
pub mod rendered;
pub mod source;

pub use browser::{BrowserDriver, BrowserSession, DriverError, SessionGuard};
#[cfg(feature = "browser")]
pub use browser::chromium::{ChromiumConfig, ChromiumDriver};
pub use copart::CopartClient;
pub use error::{CopartError, ErrorKind, PipelineError, RenderError};
pub use pipeline::{CopartSource, Pipeline};
pub use rendered::{PageProfile, RenderTimeouts, RenderedExtractor};
pub use source::LotSource;
