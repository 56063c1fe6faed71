//! Validation of identifiers loaded into a scope from user data

use crate::error::{Error, ErrorCause, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("identifier pattern is valid"));

/// Check whether a single name is a valid identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Validate that every name is made of `[A-Za-z0-9_]` only
///
/// Stops at the first invalid name and reports it. An empty input is valid.
pub fn check_identifiers<I, S>(identifiers: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for name in identifiers {
        let name = name.as_ref();
        if !is_valid_identifier(name) {
            return Err(Error::validation(ErrorCause::InvalidIdentifier(
                name.to_string(),
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Sender;
    use rstest::rstest;

    #[rstest]
    #[case("a_1")]
    #[case("Foo")]
    #[case("_")]
    #[case("123")]
    fn test_accepts_valid(#[case] name: &str) {
        assert!(check_identifiers([name]).is_ok());
    }

    #[rstest]
    #[case("a-1")]
    #[case("")]
    #[case("a b")]
    #[case("user.name")]
    #[case("naïve")]
    fn test_rejects_invalid(#[case] name: &str) {
        let err = check_identifiers([name]).unwrap_err();
        assert_eq!(err.sender, Sender::Validation);
        assert!(matches!(err.cause, ErrorCause::InvalidIdentifier(ref n) if n == name));
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(check_identifiers(Vec::<String>::new()).is_ok());
    }

    #[test]
    fn test_reports_first_offender() {
        let err = check_identifiers(["ok", "bad-one", "bad two"]).unwrap_err();
        assert!(matches!(err.cause, ErrorCause::InvalidIdentifier(ref n) if n == "bad-one"));
    }
}
