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

use crate::ingest::infer::ZiCSchema;
use crate::ingest::parser::ZiCRawRow;
use crate::ingest::value::{ZiCColumnType, ZiCValue, ZiFConvert};
use crate::record::ZiCRecord;

/// Converts raw rows into schema-aligned typed records.
#[derive(Clone, Debug)]
pub struct ZiCRowMaterializer {
    types: Vec<ZiCColumnType>,
}

impl ZiCRowMaterializer {
    #[allow(non_snake_case)]
    pub fn ZiFNew(schema: &ZiCSchema) -> Self {
        Self {
            types: schema.ZiFTypes(),
        }
    }

    /// Materializes `raw`. Short rows are padded with `Null`; a long row is
    /// truncated and the returned warning describes the dropped fields.
    #[allow(non_snake_case)]
    pub fn ZiFMaterialize(&self, raw: ZiCRawRow) -> (ZiCRecord, Option<String>) {
        let expected = self.types.len();
        let found = raw.fields.len();

        let warning = (found > expected).then(|| {
            format!(
                "line {}: {} fields, expected {}; extra fields dropped",
                raw.line_number, found, expected
            )
        });

        let mut cells: Vec<ZiCValue> = self
            .types
            .iter()
            .zip(raw.fields.iter())
            .map(|(ty, field)| ZiFConvert(*ty, field))
            .collect();
        cells.resize(expected, ZiCValue::Null);

        (ZiCRecord::ZiFNew(raw.line_number, cells), warning)
    }
}
