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

use chrono::NaiveDate;
use serde_json::json;
use zidrop::ingest::value::{ZiCCellError, ZiCColumnType, ZiCValue};
use zidrop::ingest::{ZiCColumnSpec, ZiCSchema};
use zidrop::record::{ZiCRecord, ZiCRecordBatch};

fn ZiFTSchema() -> ZiCSchema {
    let column = |name: &str, inferred_type, nullable| ZiCColumnSpec {
        name: name.to_string(),
        inferred_type,
        nullable,
    };
    ZiCSchema {
        columns: vec![
            column("id", ZiCColumnType::Integer, false),
            column("active", ZiCColumnType::Boolean, true),
            column("seen", ZiCColumnType::DateTime, true),
            column("note", ZiCColumnType::Text, true),
        ],
    }
}

#[test]
fn ZiFTRecordNewKeepsLineAndCells() {
    let record = ZiCRecord::ZiFNew(4, vec![ZiCValue::Integer(9), ZiCValue::Null]);

    assert_eq!(record.line_number, 4);
    assert_eq!(record.ZiFCell(0), Some(&ZiCValue::Integer(9)));
    assert_eq!(record.ZiFCell(2), None);
    assert_eq!(record.ZiFNullCount(), 1);
    assert_eq!(record.ZiFErrorCount(), 0);
}

#[test]
fn ZiFTRecordGetLooksUpByColumnName() {
    let schema = ZiFTSchema();
    let record = ZiCRecord::ZiFNew(
        2,
        vec![
            ZiCValue::Integer(1),
            ZiCValue::Boolean(true),
            ZiCValue::Null,
            ZiCValue::Text("ok".into()),
        ],
    );

    assert_eq!(record.ZiFGet(&schema, "active"), Some(&ZiCValue::Boolean(true)));
    assert_eq!(record.ZiFGet(&schema, "note"), Some(&ZiCValue::Text("ok".into())));
    assert_eq!(record.ZiFGet(&schema, "missing"), None);
}

#[test]
fn ZiFTRecordJsonViewRendersEveryCellKind() {
    let schema = ZiFTSchema();
    let seen = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .expect("valid date");
    let record = ZiCRecord::ZiFNew(
        7,
        vec![
            ZiCValue::Integer(3),
            ZiCValue::Error(ZiCCellError {
                raw_text: "maybe".into(),
                reason: "expected a boolean".into(),
            }),
            ZiCValue::DateTime(seen),
            ZiCValue::Null,
        ],
    );

    assert_eq!(
        record.ZiFToJson(&schema),
        json!({
            "id": 3,
            "active": {"error": "expected a boolean", "raw": "maybe"},
            "seen": "2024-03-01T12:30:00",
            "note": null,
        })
    );
    assert_eq!(record.ZiFErrorCount(), 1);
}

#[test]
fn ZiFTRecordSerdeKeepsCellTypes() {
    let record = ZiCRecord::ZiFNew(
        3,
        vec![ZiCValue::Real(2.5), ZiCValue::Text("2.5".into())],
    );
    let encoded = serde_json::to_string(&record).expect("serialize");
    let decoded: ZiCRecord = serde_json::from_str(&encoded).expect("deserialize");

    assert_eq!(decoded, record);
    assert_ne!(decoded.cells[0], decoded.cells[1]);
}

#[test]
fn ZiFTRecordBatchAliasHandlesMultipleRecords() {
    let batch: ZiCRecordBatch = vec![
        ZiCRecord::ZiFNew(2, vec![ZiCValue::Integer(1)]),
        ZiCRecord::ZiFNew(3, vec![ZiCValue::Integer(2)]),
    ];

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1].line_number, 3);
}
