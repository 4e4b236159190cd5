pub mod auth;
pub mod dashboard;
pub mod payment;
pub mod templates;
pub mod validator;

use ezemailer_core::error::CoreError;
use ::validator::Validate;

use crate::error::{AppError, AppResult};

/// Run `validator` rules on a request body, mapping failures to 400.
pub(crate) fn validate_input(input: &impl Validate) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}
