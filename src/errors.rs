/*!
 * Error types for the noveltr application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while pulling text out of a fetched page
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The content locator matched no element on the page
    #[error("content locator matched nothing: {0}")]
    ElementNotFound(String),

    /// The content locator matched but yielded no text
    #[error("content locator yielded empty text at {0}")]
    EmptyContent(String),
}

/// Errors that can occur when fetching a chapter page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The page could not be reached at all
    #[error("page unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-success status
    #[error("page responded with status {status_code}: {url}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// URL that was requested
        url: String,
    },

    /// A locator string could not be parsed by the fetcher
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    /// Extraction failed on an otherwise reachable page
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Errors that can occur when talking to the translation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when making a request to the engine fails
    #[error("engine request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("failed to parse engine response: {0}")]
    ParseError(String),

    /// Error returned by the engine itself
    #[error("engine responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the engine
        message: String,
    },

    /// Input exceeds the engine's native unit limit
    #[error("input of {units} units exceeds engine limit of {max_units}")]
    InputTooLong {
        /// Measured unit length of the input
        units: usize,
        /// Engine limit
        max_units: usize,
    },
}

/// Errors that can occur while assembling the output artifact
#[derive(Error, Debug)]
pub enum MergeError {
    /// Nothing to merge
    #[error("no chapters to merge")]
    NoChapters,

    /// Writing the artifact failed
    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur in the novel catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Reading or writing the catalog file failed
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file could not be encoded or decoded
    #[error("catalog encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// No novel with the given id exists
    #[error("novel not found: {0}")]
    NotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the page fetcher
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from the translation engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from the merge stage
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Error from the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
