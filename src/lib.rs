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

//! # Zi Drop
//!
//! CSV and gzip-compressed CSV ingestion core. A dropped file path becomes a
//! typed tabular dataset ready to be shown as a layer by a host application.
//!
//! ## Module Overview
//!
//! - **ingest**: decompression, encoding detection, dialect sniffing, row
//!   parsing, type inference, materialization and the orchestrating reader
//! - **record**: ZiCRecord, one typed row aligned with the inferred schema
//! - **metrics**: ingest summary ("N rows imported, M cells could not be converted")
//! - **config**: detection thresholds and user overrides
//! - **errors**: ZiError and the crate-wide Result alias
//! - **log**: optional structured logging backend for the `log` facade
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use zidrop::{ZiCIngestConfig, ZiCIngestor};
//!
//! let ingestor = ZiCIngestor::ZiFNew().ZiFWithConfig(ZiCIngestConfig {
//!     sample_rows: 500,
//!     ..Default::default()
//! });
//! let mut result = ingestor.ZiFIngestPath(Path::new("stations.csv.gz"))?;
//! while let Some(batch) = result.records.next_batch()? {
//!     println!("{} records", batch.len());
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **Decompressor**: gzip detected by magic bytes, verified up front
//! 2. **Encoding detector**: BOM, UTF-8 validity, UTF-16 and single-byte heuristics
//! 3. **Dialect sniffer**: delimiter, quote and header presence from a sample
//! 4. **Row parser**: streaming tokenizer with physical line numbers
//! 5. **Type inferencer**: column types from a bounded row sample
//! 6. **Row materializer**: typed records with inline cell errors
//!
//! ## Error Handling
//!
//! Setup returns `Result<ZiCIngestResult, ZiError>`; failures there are fatal.
//! Once streaming, a malformed row ends the stream with an error while cell
//! conversion failures stay inline as `ZiCValue::Error`.

#![allow(non_snake_case)]

pub mod config;
pub mod errors;
pub mod ingest;
pub mod log;
pub mod metrics;
pub mod record;

pub use config::{ZiCIngestConfig, ZiCIngestConfigBuilder};
pub use errors::{Result, ZiError};
pub use ingest::{
    ProgressCallback, ProgressInfo, ZiCColumnSpec, ZiCColumnType, ZiCCompression, ZiCDialect,
    ZiCEncoding, ZiCIngestResult, ZiCIngestor, ZiCRecordIterator, ZiCSchema, ZiCValue,
};
pub use metrics::ZiCIngestSummary;
pub use record::{ZiCRecord, ZiCRecordBatch};
