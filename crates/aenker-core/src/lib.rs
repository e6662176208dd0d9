pub mod config;
pub mod error;

pub use config::{AenkerConfig, LogConfig, PaddingMode, StreamConfig};
pub use error::{AenkerError, AenkerResult};
