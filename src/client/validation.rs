//! 参数校验：在发出任何网络请求之前同步检查调用参数。
//!
//! Argument validation shared by the façades. Every check runs before a
//! request envelope is built, and the message names the offending parameter.

use crate::{Error, Result};
use std::path::Path;

/// Blank (empty or whitespace-only) strings are rejected.
pub fn require_text(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_param(name, format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Check several `(name, value)` pairs in order; the first blank one fails.
pub fn require_all(params: &[(&str, &str)]) -> Result<()> {
    for (name, value) in params {
        require_text(name, value)?;
    }
    Ok(())
}

pub fn require_non_empty<T>(name: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::invalid_param(name, format!("{} must not be empty", name)));
    }
    Ok(())
}

pub fn require_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::invalid_param(
            name,
            format!("{} must be greater than 0", name),
        ));
    }
    Ok(())
}

/// Inclusive range check. NaN is rejected.
pub fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(Error::invalid_param(
            name,
            format!("{} must be between {} and {}", name, min, max),
        ));
    }
    Ok(())
}

pub fn check_optional_range(name: &str, value: Option<f64>, min: f64, max: f64) -> Result<()> {
    match value {
        Some(v) => check_range(name, v, min, max),
        None => Ok(()),
    }
}

/// Non-empty path that points at an existing regular file.
pub fn require_file(name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_param(name, format!("{} must not be empty", name)));
    }
    if !path.is_file() {
        return Err(Error::invalid_param(
            name,
            format!("File not found: {}", path.display()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_blank_parameter_is_named() {
        let err = require_all(&[("dataset_id", "ds"), ("name", " "), ("text", "")]).unwrap_err();
        assert_eq!(err.message(), "name must not be empty");
        assert!(err.is_validation());
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(check_range("temperature", 0.0, 0.0, 2.0).is_ok());
        assert!(check_range("temperature", 2.0, 0.0, 2.0).is_ok());
        let err = check_range("temperature", 2.5, 0.0, 2.0).unwrap_err();
        assert_eq!(err.message(), "temperature must be between 0 and 2");
        assert!(check_range("top_p", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_optional_range("top_p", None, 0.0, 1.0).is_ok());
    }

    #[test]
    fn positive_and_non_empty() {
        assert_eq!(
            require_positive("max_tokens", 0).unwrap_err().message(),
            "max_tokens must be greater than 0"
        );
        assert!(require_positive("max_tokens", 1).is_ok());
        let empty: [u8; 0] = [];
        assert_eq!(
            require_non_empty("messages", &empty).unwrap_err().message(),
            "messages must not be empty"
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let err = require_file("file_path", Path::new("/definitely/not/here.png")).unwrap_err();
        assert_eq!(err.message(), "File not found: /definitely/not/here.png");
        assert_eq!(
            require_file("file_path", Path::new("")).unwrap_err().message(),
            "file_path must not be empty"
        );
    }
}
