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

//! # Zi Drop Record Module
//!
//! A [`ZiCRecord`] is one materialized CSV row: typed cells aligned with the
//! schema of the ingestion that produced it, plus the physical line on which
//! the row starts in the decompressed text.
//!
//! ## Design Principles
//!
//! - **Aligned**: a record always carries exactly one cell per schema column;
//!   short rows are padded with `Null`, long rows are truncated upstream
//! - **Lossless on failure**: a cell that cannot be converted keeps its raw
//!   text inside a [`ZiCValue::Error`] instead of being dropped
//! - **Serializable**: records derive serde so hosts can persist or forward them
//!
//! ## Usage Example
//!
//! ```rust
//! use zidrop::record::ZiCRecord;
//! use zidrop::ingest::value::ZiCValue;
//!
//! let record = ZiCRecord::ZiFNew(2, vec![ZiCValue::Integer(1), ZiCValue::Null]);
//! assert_eq!(record.ZiFCell(0), Some(&ZiCValue::Integer(1)));
//! assert_eq!(record.ZiFErrorCount(), 0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ingest::infer::ZiCSchema;
use crate::ingest::value::ZiCValue;

/// Typed row produced by the ingestion pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCRecord {
    /// 1-based physical line where the row starts.
    pub line_number: usize,

    /// One cell per schema column, in schema order.
    pub cells: Vec<ZiCValue>,
}

impl ZiCRecord {
    #[allow(non_snake_case)]
    pub fn ZiFNew(line_number: usize, cells: Vec<ZiCValue>) -> Self {
        ZiCRecord { line_number, cells }
    }

    #[allow(non_snake_case)]
    pub fn ZiFCell(&self, index: usize) -> Option<&ZiCValue> {
        self.cells.get(index)
    }

    /// Looks a cell up by column name.
    #[allow(non_snake_case)]
    pub fn ZiFGet<'a>(&'a self, schema: &ZiCSchema, name: &str) -> Option<&'a ZiCValue> {
        let index = schema.columns.iter().position(|c| c.name == name)?;
        self.cells.get(index)
    }

    /// Number of cells that failed conversion.
    #[allow(non_snake_case)]
    pub fn ZiFErrorCount(&self) -> usize {
        self.cells.iter().filter(|c| c.is_error()).count()
    }

    #[allow(non_snake_case)]
    pub fn ZiFNullCount(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Renders the record as a JSON object keyed by column name.
    ///
    /// Date-times use ISO 8601, failed cells become
    /// `{"error": reason, "raw": text}` and non-finite reals become `null`.
    #[allow(non_snake_case)]
    pub fn ZiFToJson(&self, schema: &ZiCSchema) -> Value {
        let mut object = Map::new();
        for (column, cell) in schema.columns.iter().zip(&self.cells) {
            let value = match cell {
                ZiCValue::Integer(v) => Value::from(*v),
                ZiCValue::Real(v) => serde_json::Number::from_f64(*v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                ZiCValue::Boolean(v) => Value::Bool(*v),
                ZiCValue::DateTime(v) => Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
                ZiCValue::Text(v) => Value::String(v.clone()),
                ZiCValue::Null => Value::Null,
                ZiCValue::Error(err) => serde_json::json!({
                    "error": err.reason,
                    "raw": err.raw_text,
                }),
            };
            object.insert(column.name.clone(), value);
        }
        Value::Object(object)
    }
}

/// Convenience alias for working on batches of records.
pub type ZiCRecordBatch = Vec<ZiCRecord>;
