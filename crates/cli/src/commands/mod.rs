//! Command implementations.

use std::path::Path;
use std::sync::Arc;

use shopcart_session::{
    ConfigError, OpenError, ReqwestHttpClient, SessionError, ShopConfig, ShopState, SystemBrowser,
    UrlOpener,
};
use thiserror::Error;

pub mod cart;
pub mod products;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The config file named on the command line could not be used.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A cart or catalog operation failed.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// No product with the given ID.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Load the config from `path`, or from the environment if none is given.
pub fn load_config(path: Option<&Path>) -> Result<ShopConfig, CommandError> {
    let config = match path {
        Some(path) => ShopConfig::load(path)?.with_env_overrides()?,
        None => ShopConfig::from_env()?,
    };
    Ok(config)
}

/// Prints checkout URLs to stdout.
struct PrintUrl;

impl UrlOpener for PrintUrl {
    #[allow(clippy::print_stdout)]
    fn open(&self, url: &str) -> Result<(), OpenError> {
        println!("Open to complete checkout: {url}");
        Ok(())
    }
}

/// Wire the session over `reqwest`.
pub fn build_state(config: ShopConfig, no_open: bool) -> ShopState {
    let opener: Arc<dyn UrlOpener> = if no_open {
        Arc::new(PrintUrl)
    } else {
        Arc::new(SystemBrowser::new())
    };
    ShopState::new(config, Arc::new(ReqwestHttpClient::new()), opener)
}
