#![deny(unused_variables)]

pub mod config;
pub mod error;
pub mod filters;
pub mod http;
pub mod outcome;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use outcome::{DegradeReason, Outcome};
