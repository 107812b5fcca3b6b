use std::collections::HashMap;

use strum::{Display, EnumString, VariantNames};

/// Shown for any `error` query value that is not a known code.
pub const FALLBACK_MESSAGE: &str = "An error occurred.";

/// The symbolic codes the gateway redirects with when an auth operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    NotLoggedIn,
    LogoutFailed,
    CallbackFailed,
    LoginFailed,
    UserInfoFailed,
}

impl ErrorCode {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotLoggedIn => "You need to be logged in to view the profile.",
            Self::LogoutFailed => "Logout failed. Please try again.",
            Self::CallbackFailed => "Authentication callback failed. Please try logging in again.",
            Self::LoginFailed => "Login failed. Please try again.",
            Self::UserInfoFailed => "Failed to get user information. Please try again.",
        }
    }
}

/// Looks up the human readable message for an `error` query value.
pub fn error_message(code: &str) -> &'static str {
    code.parse::<ErrorCode>()
        .map_or(FALLBACK_MESSAGE, ErrorCode::message)
}

/// The message to display for a page's query string, if it carries a non-empty `error`.
pub fn flash_error(params: &HashMap<String, String>) -> Option<&'static str> {
    params
        .get("error")
        .filter(|code| !code.is_empty())
        .map(|code| error_message(code))
}
