//! OTP registry errors.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Please wait {} seconds before requesting another OTP", retry_after.as_secs_f64().ceil())]
    Cooldown { retry_after: Duration },

    #[error("Phone number and OTP are required")]
    MissingInput,

    #[error("OTP not found or expired. Please request a new one.")]
    NotFound,

    #[error("OTP has expired. Please request a new one.")]
    Expired,

    #[error("Maximum attempts exceeded. Please request a new OTP.")]
    TooManyAttempts,

    #[error("Invalid OTP. {remaining} attempts remaining.")]
    InvalidCode { remaining: u32 },
}
