//! Unified error system for the Divvy service.
//!
//! - [`ReturnCode`]: closed set of machine-readable codes carried by every
//!   API response (`"SUCCESS"` is the only code paired with a 2xx status)
//! - [`ErrorCategory`]: classification of codes by failure domain
//! - [`AppError`]: error type with a code and human-readable message
//! - [`ApiResponse`]: response envelope with a flattened payload
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ApiResponse, ReturnCode};
//!
//! let err = AppError::new(ReturnCode::ItemNotFound);
//! let err = AppError::with_message(ReturnCode::MissingFields, "event_id is required.");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.return_code, ReturnCode::MissingFields);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::ReturnCode;
pub use types::{ApiResponse, AppError, AppResult};
