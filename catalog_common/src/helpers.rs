use std::{fmt::Display, str::FromStr};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse a value of type `T` from an optional string. Missing or unparseable values yield the default. The error
/// from a failed parse is handed to `on_error` so that callers can log it against the right variable name.
pub fn parse_env_or_default<T, F>(value: Option<String>, default: T, on_error: F) -> T
where
    T: FromStr,
    T::Err: Display,
    F: FnOnce(&str, String),
{
    match value {
        None => default,
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            on_error(&s, e.to_string());
            default
        }),
    }
}
