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

//! Typed cell values and the per-type parsers.
//!
//! The same parsers drive type inference (does a sampled cell match a type?)
//! and materialization (convert a streamed cell to its column type), so a
//! value accepted during inference always converts later.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Semantic column types, declared in inference priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZiCColumnType {
    Boolean,
    Integer,
    Real,
    DateTime,
    Text,
}

/// Most specific first; `Text` always matches.
pub const ZI_TYPE_PRIORITY: [ZiCColumnType; 5] = [
    ZiCColumnType::Boolean,
    ZiCColumnType::Integer,
    ZiCColumnType::Real,
    ZiCColumnType::DateTime,
    ZiCColumnType::Text,
];

impl ZiCColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCColumnType::Boolean => "boolean",
            ZiCColumnType::Integer => "integer",
            ZiCColumnType::Real => "real",
            ZiCColumnType::DateTime => "datetime",
            ZiCColumnType::Text => "text",
        }
    }

    /// Bit used in match masks.
    pub fn bit(&self) -> u8 {
        match self {
            ZiCColumnType::Boolean => 1,
            ZiCColumnType::Integer => 1 << 1,
            ZiCColumnType::Real => 1 << 2,
            ZiCColumnType::DateTime => 1 << 3,
            ZiCColumnType::Text => 1 << 4,
        }
    }

    /// Highest-priority type contained in `mask`.
    #[allow(non_snake_case)]
    pub fn ZiFMostSpecific(mask: u8) -> ZiCColumnType {
        ZI_TYPE_PRIORITY
            .iter()
            .copied()
            .find(|ty| mask & ty.bit() != 0)
            .unwrap_or(ZiCColumnType::Text)
    }
}

impl fmt::Display for ZiCColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell that could not be converted to its column type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCCellError {
    pub raw_text: String,
    pub reason: String,
}

/// One typed cell of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZiCValue {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Text(String),
    Null,
    Error(ZiCCellError),
}

impl ZiCValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ZiCValue::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ZiCValue::Error(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ZiCValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ZiCValue::Real(v) => Some(*v),
            ZiCValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ZiCValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

const BOOLEAN_TRUE: [&str; 2] = ["true", "yes"];
const BOOLEAN_FALSE: [&str; 2] = ["false", "no"];

const DATETIME_FORMATS: [&str; 12] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y", "%m/%d/%Y"];

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?(?:0|[1-9][0-9]*)$").expect("valid integer regex"))
}

fn real_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:(?:0|[1-9][0-9]*)(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("valid real regex")
    })
}

/// Case-insensitive boolean literal.
#[allow(non_snake_case)]
pub fn ZiFParseBoolean(text: &str) -> Option<bool> {
    let lowered = text.to_ascii_lowercase();
    if BOOLEAN_TRUE.contains(&lowered.as_str()) {
        Some(true)
    } else if BOOLEAN_FALSE.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Signed decimal integer without superfluous leading zeros.
#[allow(non_snake_case)]
pub fn ZiFParseInteger(text: &str) -> std::result::Result<i64, String> {
    if !integer_pattern().is_match(text) {
        return Err("expected an integer".to_string());
    }
    text.parse::<i64>()
        .map_err(|_| "integer out of range".to_string())
}

/// Signed decimal number with optional fraction and exponent.
#[allow(non_snake_case)]
pub fn ZiFParseReal(text: &str) -> Option<f64> {
    if !real_pattern().is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Date or date-time in one of the recognized layouts; dates map to midnight
/// and offsets are normalized to UTC.
#[allow(non_snake_case)]
pub fn ZiFParseDateTime(text: &str) -> Option<NaiveDateTime> {
    if text.len() < 6 || !text.as_bytes()[0].is_ascii_digit() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Bitmask of every column type `raw` satisfies, or `None` for an empty cell.
#[allow(non_snake_case)]
pub fn ZiFMatchMask(raw: &str) -> Option<u8> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let mut mask = ZiCColumnType::Text.bit();
    if ZiFParseBoolean(text).is_some() {
        mask |= ZiCColumnType::Boolean.bit();
    }
    if ZiFParseInteger(text).is_ok() {
        mask |= ZiCColumnType::Integer.bit();
    }
    if ZiFParseReal(text).is_some() {
        mask |= ZiCColumnType::Real.bit();
    }
    if ZiFParseDateTime(text).is_some() {
        mask |= ZiCColumnType::DateTime.bit();
    }
    Some(mask)
}

/// Most specific type of a single cell, `None` when empty.
#[allow(non_snake_case)]
pub fn ZiFClassify(raw: &str) -> Option<ZiCColumnType> {
    ZiFMatchMask(raw).map(ZiCColumnType::ZiFMostSpecific)
}

/// Converts `raw` to `ty`. Empty cells become `Null`; failures become
/// `Error` cells keeping the raw text.
#[allow(non_snake_case)]
pub fn ZiFConvert(ty: ZiCColumnType, raw: &str) -> ZiCValue {
    let text = raw.trim();
    if text.is_empty() {
        return ZiCValue::Null;
    }
    let failed = |reason: &str| {
        ZiCValue::Error(ZiCCellError {
            raw_text: raw.to_string(),
            reason: reason.to_string(),
        })
    };
    match ty {
        ZiCColumnType::Boolean => match ZiFParseBoolean(text) {
            Some(v) => ZiCValue::Boolean(v),
            None => failed("expected a boolean"),
        },
        ZiCColumnType::Integer => match ZiFParseInteger(text) {
            Ok(v) => ZiCValue::Integer(v),
            Err(reason) => failed(&reason),
        },
        ZiCColumnType::Real => match ZiFParseReal(text) {
            Some(v) => ZiCValue::Real(v),
            None => failed("expected a real number"),
        },
        ZiCColumnType::DateTime => match ZiFParseDateTime(text) {
            Some(v) => ZiCValue::DateTime(v),
            None => failed("expected a date or date-time"),
        },
        ZiCColumnType::Text => ZiCValue::Text(raw.to_string()),
    }
}
