//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

//! # Data Ingestion Module
//!
//! This module turns a dropped `.csv` or `.csv.gz` file into a typed record
//! stream.
//!
//! ## Module Components
//!
//! - **Decompression** ([format.rs](format/index.html)): gzip detection by magic bytes
//! - **Encoding** ([encoding.rs](encoding/index.html)): encoding detection and incremental decoding
//! - **Dialect** ([dialect.rs](dialect/index.html)): delimiter, quote and header sniffing
//! - **Parser** ([parser.rs](parser/index.html)): streaming, quote-aware row tokenizer
//! - **Values** ([value.rs](value/index.html)): typed cells and per-type parsers
//! - **Inference** ([infer.rs](infer/index.html)): column names and types from a bounded sample
//! - **Materialization** ([materialize.rs](materialize/index.html)): raw rows to typed records
//! - **Reader** ([reader.rs](reader/index.html)): orchestration with progress tracking
//!
//! ## Supported Input
//!
//! - **CSV** with `,`, `;` or tab delimiters and `"` or `'` quoting
//! - **Gzip**: single or multi-member archives, detected by content
//! - **Encodings**: UTF-8, UTF-16LE/BE (with BOM or by NUL pattern),
//!   windows-1251 and windows-1252, or any `encoding_rs` label as override
//!
//! ## Usage Patterns
//!
//! ```rust
//! use std::path::Path;
//! use zidrop::ingest::ZiCIngestor;
//!
//! let mut result = ZiCIngestor::ZiFNew().ZiFIngestPath(Path::new("trips.csv.gz"))?;
//! println!("layer {} with columns {:?}", result.layer_name, result.schema.names());
//! for record in result.records.by_ref() {
//!     let record = record?;
//!     println!("line {}: {:?}", record.line_number, record.cells);
//! }
//! println!("{}", result.records.ZiFSummary().ZiFDescribe());
//! ```

pub mod dialect;
pub mod encoding;
pub mod format;
pub mod infer;
pub mod materialize;
pub mod parser;
pub mod reader;
pub mod value;

pub use dialect::{ZiCDialect, ZiCDialectSniffer, ZiCSniffOutcome};
pub use encoding::{ZiCEncoding, ZiCEncodingDetector, ZiCEncodingOutcome, ZiCTextDecoder};
pub use format::{ZiCCompression, ZiCDecompressor, ZiCOpenedSource, ZiCSource};
pub use infer::{ZiCColumnSpec, ZiCSchema, ZiCTypeInferencer};
pub use materialize::ZiCRowMaterializer;
pub use parser::{ZiCRawRow, ZiCRowParser};
pub use reader::{
    ProgressCallback, ProgressInfo, ZiCIngestResult, ZiCIngestor, ZiCRecordIterator, ZiFLayerName,
};
pub use value::{ZiCCellError, ZiCColumnType, ZiCValue};
