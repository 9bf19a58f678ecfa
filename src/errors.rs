//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Zi Drop Error Module
//!
//! This module defines the error types used throughout the ingestion core.
//!
//! ## Error Categories
//!
//! Errors fall into two groups that are propagated differently:
//!
//! - **Fatal / pipeline-level**: `Io`, `CorruptArchive`, `UndetectableDialect`
//!   and `Config`. They abort ingestion before any record is produced and carry
//!   the offending file path.
//! - **Row-level**: `MalformedRow` (and late `Io`/`CorruptArchive` failures of a
//!   stream that already started). They end the record stream but leave every
//!   record yielded before them intact.
//!
//! Cell conversion failures are not errors at all: they are embedded in the
//! record as [`ZiCCellError`](crate::ingest::value::ZiCCellError) values.
//!
//! ## Usage
//!
//! ```rust
//! use zidrop::errors::{Result, ZiError};
//!
//! fn open(path: &str) -> Result<std::fs::File> {
//!     std::fs::File::open(path).map_err(|err| ZiError::io(path, err))
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Zi Drop.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zi Drop.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum ZiError {
    /// The source could not be opened or read.
    #[error("io error on '{path}': {message}")]
    Io { path: String, message: String },

    /// Gzip magic bytes were present but the stream could not be decompressed.
    #[error("corrupt gzip archive '{path}': {message}")]
    CorruptArchive { path: String, message: String },

    /// No delimiter produced a consistent column layout over the sample.
    #[error("cannot detect csv dialect of '{path}': {message}")]
    UndetectableDialect { path: String, message: String },

    /// A record could not be parsed; the stream ends here.
    #[error("malformed row at line {line_number}: {reason}")]
    MalformedRow { line_number: usize, reason: String },

    /// Invalid ingestion configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io {
            path: String::new(),
            message: err.to_string(),
        }
    }
}

impl ZiError {
    /// Helper to construct IO errors bound to a path.
    pub fn io(path: impl AsRef<str>, err: impl ToString) -> Self {
        ZiError::Io {
            path: path.as_ref().to_string(),
            message: err.to_string(),
        }
    }

    /// Helper to construct corrupt archive errors.
    pub fn corrupt_archive(path: impl AsRef<str>, message: impl Into<String>) -> Self {
        ZiError::CorruptArchive {
            path: path.as_ref().to_string(),
            message: message.into(),
        }
    }

    /// Helper to construct dialect detection errors.
    pub fn undetectable_dialect(path: impl AsRef<str>, message: impl Into<String>) -> Self {
        ZiError::UndetectableDialect {
            path: path.as_ref().to_string(),
            message: message.into(),
        }
    }

    /// Helper to construct malformed row errors.
    pub fn malformed_row(line_number: usize, reason: impl Into<String>) -> Self {
        ZiError::MalformedRow {
            line_number,
            reason: reason.into(),
        }
    }

    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        ZiError::Config {
            message: message.into(),
        }
    }

    /// Binds the error to `path` when it carries one and none is set yet.
    #[allow(non_snake_case)]
    pub fn ZiFAtPath(self, path: &str) -> Self {
        match self {
            ZiError::Io { path: p, message } if p.is_empty() => ZiError::Io {
                path: path.to_string(),
                message,
            },
            ZiError::CorruptArchive { path: p, message } if p.is_empty() => {
                ZiError::CorruptArchive {
                    path: path.to_string(),
                    message,
                }
            }
            ZiError::UndetectableDialect { path: p, message } if p.is_empty() => {
                ZiError::UndetectableDialect {
                    path: path.to_string(),
                    message,
                }
            }
            other => other,
        }
    }

    /// Whether the error belongs to the pipeline-level category.
    #[allow(non_snake_case)]
    pub fn ZiFIsFatal(&self) -> bool {
        !matches!(self, ZiError::MalformedRow { .. })
    }
}
