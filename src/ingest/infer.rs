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

//! Column naming and type inference over the sampled rows.
//!
//! A column's type is the most specific type every non-empty sampled cell
//! satisfies. Empty cells only make the column nullable.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ingest::dialect::ZiCDialect;
use crate::ingest::parser::ZiCRawRow;
use crate::ingest::value::{ZiCColumnType, ZiFMatchMask};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCColumnSpec {
    pub name: String,
    pub inferred_type: ZiCColumnType,
    pub nullable: bool,
}

/// Ordered column specs; names are unique and non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCSchema {
    pub columns: Vec<ZiCColumnSpec>,
}

impl ZiCSchema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[allow(non_snake_case)]
    pub fn ZiFColumn(&self, name: &str) -> Option<&ZiCColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFTypes(&self) -> Vec<ZiCColumnType> {
        self.columns.iter().map(|c| c.inferred_type).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZiCTypeInferencer {
    fallback_width: usize,
}

impl ZiCTypeInferencer {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self { fallback_width: 0 }
    }

    /// Width used when the sample holds no row at all, for example when the
    /// first record is malformed. Such columns are nullable `Text`.
    #[allow(non_snake_case)]
    pub fn ZiFWithFallbackWidth(mut self, width: usize) -> Self {
        self.fallback_width = width;
        self
    }

    /// Infers the schema from the sampled rows. When the dialect has a header
    /// the first row supplies the names and is not used for typing.
    #[allow(non_snake_case)]
    pub fn ZiFInfer(&self, dialect: &ZiCDialect, rows: &[ZiCRawRow]) -> ZiCSchema {
        let (header, data) = match (dialect.has_header, rows.split_first()) {
            (true, Some((first, rest))) => (Some(first), rest),
            _ => (None, rows),
        };

        let width = match header {
            Some(row) => row.fields.len(),
            None => modal_width(data),
        };
        let width = if width == 0 { self.fallback_width } else { width };

        let mut masks: Vec<Option<u8>> = vec![None; width];
        let mut nullable = vec![false; width];
        for row in data {
            for col in 0..width {
                match row.fields.get(col).and_then(|cell| ZiFMatchMask(cell)) {
                    Some(mask) => {
                        masks[col] = Some(masks[col].map_or(mask, |acc| acc & mask));
                    }
                    None => nullable[col] = true,
                }
            }
        }

        let raw_names: Vec<&str> = match header {
            Some(row) => row.fields.iter().map(String::as_str).collect(),
            None => Vec::new(),
        };
        let names = ZiFColumnNames(&raw_names, width);

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(col, name)| {
                let (inferred_type, nullable) = match masks[col] {
                    Some(mask) => (ZiCColumnType::ZiFMostSpecific(mask), nullable[col]),
                    None => (ZiCColumnType::Text, true),
                };
                ZiCColumnSpec {
                    name,
                    inferred_type,
                    nullable,
                }
            })
            .collect();

        let schema = ZiCSchema { columns };
        log::debug!(
            "inferred {} columns from {} sampled rows: {:?}",
            schema.len(),
            data.len(),
            schema
                .columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.inferred_type))
                .collect::<Vec<_>>()
        );
        schema
    }
}

/// Most common field count; ties go to the wider layout.
fn modal_width(rows: &[ZiCRawRow]) -> usize {
    let mut tally: HashMap<usize, usize> = HashMap::new();
    for row in rows {
        *tally.entry(row.fields.len()).or_insert(0) += 1;
    }
    tally
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(width, _)| width)
        .unwrap_or(0)
}

/// Cleans header cells into unique, non-empty column names.
///
/// Surrounding whitespace and quote characters are stripped, empty names
/// become `field_N` (1-based) and repeated names get `_2`, `_3`, ... suffixes.
#[allow(non_snake_case)]
pub fn ZiFColumnNames(raw: &[&str], width: usize) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(width);
    for col in 0..width {
        let cleaned = raw
            .get(col)
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
            .unwrap_or("");
        let base = if cleaned.is_empty() {
            format!("field_{}", col + 1)
        } else {
            cleaned.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 2;
        while taken.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        taken.insert(name.clone());
        names.push(name);
    }
    names
}
