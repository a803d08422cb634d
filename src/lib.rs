pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod storage;

pub use error::{Result, SwotError};
pub use storage::Repository;
