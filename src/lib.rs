pub mod config;
pub mod error;
pub mod export;
pub mod matcher;
pub mod model;
pub mod pipeline;
pub mod signer;
pub mod sportszone;
pub mod teamcowboy;
pub mod translator;

pub use error::{Error, Result};
