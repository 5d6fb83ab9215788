//! # Local Validation
//!
//! Checks performed before any request leaves the client. A failure blocks
//! the request and its `Display` text is the message shown to the user.

use regex::Regex;
use std::sync::LazyLock;

use super::forms::{BlogPostInput, CommentInput, Credentials, LoginCredentials};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Login names: ASCII letters, digits and underscore, 3 to 32 characters
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,32}$").expect("username pattern is valid"));

/// Characters a password may be built from
static PASSWORD_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").expect("password charset pattern is valid")
});

/// Symbols of which a password needs at least one
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const PASSWORD_RULES: &str = "Password must contain at least one uppercase letter, one lowercase letter, one special character, one number, and be at least 8 characters long.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("{rules}", rules = PASSWORD_RULES)]
    WeakPassword,
    #[error("Invalid email or username.")]
    InvalidLoginIdentifier,
    #[error("Invalid password format. {rules}", rules = PASSWORD_RULES)]
    InvalidLoginPassword,
    #[error("Title and content are required fields")]
    MissingPostFields,
    #[error("Commenter name and comment text are required fields")]
    MissingCommentFields,
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_username(value: &str) -> bool {
    USERNAME_PATTERN.is_match(value)
}

/// At least 8 characters from the allowed set, with one lowercase letter,
/// one uppercase letter, one digit and one symbol from [`PASSWORD_SYMBOLS`].
pub fn meets_password_policy(password: &str) -> bool {
    PASSWORD_CHARSET.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

pub fn validate_registration(credentials: &Credentials) -> Result<(), ValidationError> {
    if !is_email(&credentials.email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !meets_password_policy(&credentials.password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<(), ValidationError> {
    let identifier = &credentials.username_or_email;
    if !is_email(identifier) && !is_username(identifier) {
        return Err(ValidationError::InvalidLoginIdentifier);
    }
    if !meets_password_policy(&credentials.password) {
        return Err(ValidationError::InvalidLoginPassword);
    }
    Ok(())
}

pub fn validate_post(input: &BlogPostInput) -> Result<(), ValidationError> {
    if input.title.is_empty() || input.content.is_empty() {
        return Err(ValidationError::MissingPostFields);
    }
    Ok(())
}

pub fn validate_comment(input: &CommentInput) -> Result<(), ValidationError> {
    if input.commenter_name.is_empty() || input.comment_text.is_empty() {
        return Err(ValidationError::MissingCommentFields);
    }
    Ok(())
}
