#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod command;
pub mod error;
pub mod pagination;
pub mod queries;

pub use error::NgsiError;
