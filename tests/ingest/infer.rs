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

use zidrop::ingest::dialect::ZiCDialect;
use zidrop::ingest::infer::{ZiCSchema, ZiCTypeInferencer};
use zidrop::ingest::parser::ZiCRawRow;
use zidrop::ingest::value::ZiCColumnType;

fn ZiFTRows(lines: &[&[&str]]) -> Vec<ZiCRawRow> {
    lines
        .iter()
        .enumerate()
        .map(|(i, fields)| ZiCRawRow {
            line_number: i + 1,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}

fn ZiFTInfer(lines: &[&[&str]], has_header: bool) -> ZiCSchema {
    let dialect = ZiCDialect::ZiFNew(',', '"', has_header).expect("dialect");
    ZiCTypeInferencer::ZiFNew().ZiFInfer(&dialect, &ZiFTRows(lines))
}

fn ZiFTColumnType(values: &[&str]) -> ZiCColumnType {
    let mut lines: Vec<&[&str]> = Vec::new();
    lines.push(&["v"]);
    let cells: Vec<[&str; 1]> = values.iter().map(|v| [*v]).collect();
    for cell in &cells {
        lines.push(cell);
    }
    ZiFTInfer(&lines, true).columns[0].inferred_type
}

#[test]
fn ZiFTInferTypesAreMonotonic() {
    assert_eq!(ZiFTColumnType(&["1", "2", "3"]), ZiCColumnType::Integer);
    assert_eq!(ZiFTColumnType(&["1", "2", "3", "+3.5"]), ZiCColumnType::Real);
    assert_eq!(ZiFTColumnType(&["1", "2", "3", "+3.5", "+x"]), ZiCColumnType::Text);
}

#[test]
fn ZiFTInferRecognizesEveryType() {
    assert_eq!(ZiFTColumnType(&["true", "No", "YES"]), ZiCColumnType::Boolean);
    assert_eq!(ZiFTColumnType(&["0", "1", "1"]), ZiCColumnType::Integer);
    assert_eq!(ZiFTColumnType(&["1.5", "-2e3", "7"]), ZiCColumnType::Real);
    assert_eq!(
        ZiFTColumnType(&["2024-01-31", "2024-02-01 08:30:00"]),
        ZiCColumnType::DateTime
    );
    assert_eq!(ZiFTColumnType(&["true", "1"]), ZiCColumnType::Text);
}

#[test]
fn ZiFTInferLeadingZeroCodesStayText() {
    assert_eq!(ZiFTColumnType(&["007", "010"]), ZiCColumnType::Text);
}

#[test]
fn ZiFTInferEmptyCellsMarkNullable() {
    let schema = ZiFTInfer(&[&["a", "b", "c"], &["1", "", ""], &["2", "x"]], true);
    assert_eq!(schema.columns[0].inferred_type, ZiCColumnType::Integer);
    assert!(!schema.columns[0].nullable);
    assert_eq!(schema.columns[1].inferred_type, ZiCColumnType::Text);
    assert!(schema.columns[1].nullable);
    assert_eq!(schema.columns[2].inferred_type, ZiCColumnType::Text);
    assert!(schema.columns[2].nullable);
}

#[test]
fn ZiFTInferDuplicateHeaderNamesGetSuffixes() {
    let schema = ZiFTInfer(&[&["id", "name", "id"], &["1", "a", "2"]], true);
    assert_eq!(schema.names(), vec!["id", "name", "id_2"]);
}

#[test]
fn ZiFTInferCleansHeaderNames() {
    let schema = ZiFTInfer(&[&[" 'lat' ", "", "lon"], &["1.5", "x", "2.5"]], true);
    assert_eq!(schema.names(), vec!["lat", "field_2", "lon"]);
}

#[test]
fn ZiFTInferWithoutHeaderUsesModalWidth() {
    let schema = ZiFTInfer(&[&["1", "a"], &["2", "b"], &["3", "c", "z"]], false);
    assert_eq!(schema.names(), vec!["field_1", "field_2"]);
    assert_eq!(schema.columns[0].inferred_type, ZiCColumnType::Integer);
}

#[test]
fn ZiFTInferEmptySampleUsesFallbackWidth() {
    let dialect = ZiCDialect::ZiFNew(',', '"', true).expect("dialect");
    let schema = ZiCTypeInferencer::ZiFNew()
        .ZiFWithFallbackWidth(2)
        .ZiFInfer(&dialect, &[]);
    assert_eq!(schema.names(), vec!["field_1", "field_2"]);
    assert!(schema
        .columns
        .iter()
        .all(|c| c.inferred_type == ZiCColumnType::Text && c.nullable));

    assert!(ZiCTypeInferencer::ZiFNew().ZiFInfer(&dialect, &[]).is_empty());
}
