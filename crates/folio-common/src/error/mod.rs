//! Error handling for folio.
//!
//! This module provides a unified error type and result alias used
//! across all folio components.

mod catalog;

pub use catalog::{ErrorCode, FolioError};

/// Result type alias for folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;
