//! Copyright © 2025 Dunimd Team. All Rights Reserved.
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

use serde::Serialize;
use serde_json::Value;

use crate::errors::ZiError;
use crate::record::ZiCRecord;

/// Running totals of one ingestion, enough to report what happened without
/// re-reading the file.
#[derive(Clone, Debug, Serialize, Default, PartialEq)]
pub struct ZiCIngestSummary {
    pub rows_imported: usize,
    pub cell_errors: usize,
    pub null_cells: usize,
    pub width_warnings: usize,
    pub suppressed_warnings: usize,
    /// Line of the row that ended the stream early, if any.
    pub truncated_at_line: Option<usize>,
    pub stream_error: Option<String>,
}

impl ZiCIngestSummary {
    #[allow(non_snake_case)]
    pub fn ZiFCompute(records: &[ZiCRecord]) -> Self {
        let mut summary = ZiCIngestSummary::default();
        for record in records {
            summary.ZiFObserve(record);
        }
        summary
    }

    #[allow(non_snake_case)]
    pub fn ZiFObserve(&mut self, record: &ZiCRecord) {
        self.rows_imported += 1;
        self.cell_errors += record.ZiFErrorCount();
        self.null_cells += record.ZiFNullCount();
    }

    /// Records the error that ended the record stream.
    #[allow(non_snake_case)]
    pub fn ZiFObserveError(&mut self, error: &ZiError) {
        if let ZiError::MalformedRow { line_number, .. } = error {
            self.truncated_at_line = Some(*line_number);
        }
        self.stream_error = Some(error.to_string());
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsComplete(&self) -> bool {
        self.stream_error.is_none()
    }

    /// One-line human readable report.
    #[allow(non_snake_case)]
    pub fn ZiFDescribe(&self) -> String {
        let mut text = format!("{} rows imported", self.rows_imported);
        if self.cell_errors > 0 {
            text.push_str(&format!(
                ", {} cells could not be converted",
                self.cell_errors
            ));
        }
        match (self.truncated_at_line, &self.stream_error) {
            (Some(line), _) => text.push_str(&format!(", file truncated at line {line}")),
            (None, Some(error)) => text.push_str(&format!(", stopped early: {error}")),
            (None, None) => {}
        }
        text
    }

    #[allow(non_snake_case)]
    pub fn ZiFAsJson(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
