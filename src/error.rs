//! Error types for the PDF lexical layer.
//!
//! This module defines all error types that can surface from the byte sources,
//! the scanner, reference resolution and dictionary accessors.

use crate::object::ObjectRef;
use std::num::ParseIntError;

/// Result type alias for PDF library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while scanning tokens or reading dictionaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dictionary has no entry under the requested key
    #[error("Dictionary does not contain key: {0}")]
    KeyNotFound(String),

    /// Dictionary value does not have the requested type
    #[error("Dictionary value at {key} is not {expected}")]
    TypeMismatch {
        /// Dictionary key that was read
        key: String,
        /// Requested type
        expected: &'static str,
        /// Why the value was rejected
        #[source]
        cause: MismatchCause,
    },

    /// Indirect reference stored in a dictionary could not be resolved
    ///
    /// Kept apart from [`Error::TypeMismatch`] so callers can tell a dangling
    /// or cyclic reference from a value of the wrong type. Use
    /// [`Error::key`] to get the offending key from either.
    #[error("Dictionary value at {key} references {reference} which could not be resolved")]
    Unresolved {
        /// Dictionary key that was read
        key: String,
        /// The reference stored under the key
        reference: ObjectRef,
        /// Underlying resolution failure
        #[source]
        source: Box<Error>,
    },

    /// Referenced object not found in the object table
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Circular reference detected in object graph
    #[error("Circular reference detected: object {0}")]
    CircularReference(ObjectRef),

    /// Recursion depth limit exceeded
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// Unexpected end of input
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason a dictionary value failed a typed accessor.
#[derive(Debug, thiserror::Error)]
pub enum MismatchCause {
    /// Value resolved to a different object variant
    #[error("found {found}")]
    WrongVariant {
        /// Type name of the value actually stored
        found: &'static str,
    },

    /// Serialized value is not an integer literal of the requested width
    #[error("not an integer literal: {0}")]
    InvalidInteger(#[from] ParseIntError),
}

impl Error {
    /// Returns true if this error means the input ran out.
    pub fn is_eof(&self) -> bool {
        match self {
            Error::UnexpectedEof => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// Key of the dictionary entry this error is scoped to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::KeyNotFound(key)
            | Error::TypeMismatch { key, .. }
            | Error::Unresolved { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_key_not_found_error() {
        let err = Error::KeyNotFound("Pages".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("does not contain key"));
        assert!(msg.contains("Pages"));
        assert_eq!(err.key(), Some("Pages"));
    }

    #[test]
    fn test_type_mismatch_error() {
        let err = Error::TypeMismatch {
            key: "Kids".to_string(),
            expected: "Dictionary",
            cause: MismatchCause::WrongVariant { found: "Array" },
        };
        assert_eq!(format!("{}", err), "Dictionary value at Kids is not Dictionary");
        let source = err.source().expect("mismatch should carry a cause");
        assert_eq!(source.to_string(), "found Array");
    }

    #[test]
    fn test_type_mismatch_wraps_parse_error() {
        let parse_err = "abc".parse::<i32>().unwrap_err();
        let err = Error::TypeMismatch {
            key: "Count".to_string(),
            expected: "int32",
            cause: MismatchCause::from(parse_err),
        };
        let source = err.source().unwrap();
        assert!(source.to_string().starts_with("not an integer literal"));
        assert!(source.source().is_some());
    }

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
        assert_eq!(err.key(), None);
    }

    #[test]
    fn test_unresolved_error_chain() {
        let err = Error::Unresolved {
            key: "Root".to_string(),
            reference: ObjectRef::new(3, 0),
            source: Box::new(Error::ObjectNotFound(3, 0)),
        };
        assert!(format!("{}", err).contains("3 0 R"));
        assert_eq!(err.source().unwrap().to_string(), "Object not found: 3 0 R");
    }

    #[test]
    fn test_is_eof() {
        assert!(Error::UnexpectedEof.is_eof());
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        assert!(Error::from(io).is_eof());
        assert!(!Error::RecursionLimitExceeded(4).is_eof());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
