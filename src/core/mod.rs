pub mod config;
pub mod error;

pub use config::{DetectConfig, DetectOverrides, RunConfig, RunOverrides};
pub use error::{ArcError, Result};
