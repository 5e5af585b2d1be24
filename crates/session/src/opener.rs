//! Handing checkout URLs to the host.

use std::io;

use thiserror::Error;
use tracing::info;

/// The URL could not be handed off.
#[derive(Debug, Error)]
#[error("Failed to open {url}: {reason}")]
pub struct OpenError {
    pub url: String,
    pub reason: String,
}

/// Opens an external URL, usually in the user's browser.
pub trait UrlOpener: Send + Sync {
    /// Open `url`.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if the host could not be asked to open it.
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

type Launch = fn(&str) -> io::Result<()>;

/// Opens URLs with the platform's default handler.
///
/// The URL is passed to the handler as a single argument, never through a
/// shell, and the handler runs detached from this process.
#[derive(Clone, Copy)]
pub struct SystemBrowser {
    launch: Launch,
}

impl std::fmt::Debug for SystemBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemBrowser").finish_non_exhaustive()
    }
}

impl Default for SystemBrowser {
    fn default() -> Self {
        Self {
            launch: |url| open::that_detached(url),
        }
    }
}

impl SystemBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        info!(url, "Opening URL in system browser");
        (self.launch)(url).map_err(|e| OpenError {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
