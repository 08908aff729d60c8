//! Error types for the outer surfaces of the generator.
//!
//! The extraction, compression and serialization pipeline never fails: a
//! missing source file or an unknown directive simply drops that item. Errors
//! only surface where the crate talks to the outside world:
//!
//! - **Page lookup**: a page path with no markdown in the site content map
//! - **I/O**: writing generated output to a writer
//! - **JSON**: serializing extracted records for the `page.json` variant
//!
//! ## Examples
//!
//! ```rust
//! use docs_toon::{Error, PageFormat, Site};
//!
//! let site = Site::new("https://docs.example.com");
//! let err = site.render("/missing", PageFormat::Toon).unwrap_err();
//! assert!(matches!(err, Error::PageNotFound(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised outside the extraction pipeline.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The requested page has no markdown in the content map
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates the 404-equivalent error for a page path with no content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use docs_toon::Error;
    ///
    /// let err = Error::page_not_found("/docs/missing");
    /// assert!(err.to_string().contains("/docs/missing"));
    /// ```
    pub fn page_not_found(path: &str) -> Self {
        Error::PageNotFound(path.to_string())
    }

    /// Creates a JSON serialization error.
    pub fn json<T: fmt::Display>(msg: T) -> Self {
        Error::Json(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::json(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
