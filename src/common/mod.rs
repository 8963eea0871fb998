pub mod error;

pub use error::{ApiError, ApiResult, AppError, AppResult, FieldError};
