//! Utility functions for common operations.
//!
//! - **URL validation**: base URL checks and safe link opening
//! - **Text processing**: Unicode-aware width, truncation and sanitizing of
//!   backend-supplied text before it reaches the terminal

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_base_url, validate_url_for_open, UrlValidationError};
