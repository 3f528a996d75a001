//! Form validation for command arguments.
//!
//! Each check returns the message shown to the user on failure.

use regex::Regex;
use std::sync::LazyLock;

// `\d` is Unicode-aware in the regex crate; only ASCII digits are accepted.
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static OTP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"));
static DIAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{1,4}$").expect("valid regex"));
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static ROOM_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_]+$").expect("valid regex"));

pub type Validation = Result<(), &'static str>;

pub fn validate_phone(phone: &str) -> Validation {
    let len = phone.chars().count();
    if len < 10 {
        return Err("Phone number must be at least 10 digits");
    }
    if len > 15 {
        return Err("Phone number must be less than 15 digits");
    }
    if !DIGITS.is_match(phone) {
        return Err("Phone number can only contain digits");
    }
    Ok(())
}

pub fn validate_dial_code(dial_code: &str) -> Validation {
    if dial_code.is_empty() {
        return Err("Country code is required");
    }
    if !DIAL_CODE.is_match(dial_code) {
        return Err("Country code must look like +44");
    }
    Ok(())
}

pub fn validate_otp(otp: &str) -> Validation {
    if otp.chars().count() != 6 {
        return Err("OTP must be exactly 6 digits");
    }
    if !OTP.is_match(otp) {
        return Err("OTP must contain only digits");
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Validation {
    let len = name.chars().count();
    if len < 2 {
        return Err("Name must be at least 2 characters");
    }
    if len > 50 {
        return Err("Name must be less than 50 characters");
    }
    if !NAME.is_match(name) {
        return Err("Name can only contain letters and spaces");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Validation {
    if !EMAIL.is_match(email) {
        return Err("Please enter a valid email address");
    }
    let len = email.chars().count();
    if len < 5 {
        return Err("Email must be at least 5 characters");
    }
    if len > 100 {
        return Err("Email must be less than 100 characters");
    }
    Ok(())
}

pub fn validate_room_title(title: &str) -> Validation {
    let len = title.chars().count();
    if len < 3 {
        return Err("Title must be at least 3 characters");
    }
    if len > 50 {
        return Err("Title must be less than 50 characters");
    }
    if !ROOM_TITLE.is_match(title) {
        return Err(
            "Title can only contain letters, numbers, spaces, hyphens, and underscores",
        );
    }
    Ok(())
}
