#![doc = include_str!("../README.md")]

pub mod env;
pub mod error;

pub use error::{ApiError, BetterAuthError, ErrorCode, HttpStatus};
