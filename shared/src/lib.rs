//! Shared types for the Divvy bill-splitting service.
//!
//! Everything that crosses the wire or is reused between the server and its
//! tests lives here: domain models, the error/response system, and small
//! utilities (timestamps, ID generation, item-name normalization).

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ReturnCode};
