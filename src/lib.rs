pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod scanner;

pub use photo_dup_common as common;
