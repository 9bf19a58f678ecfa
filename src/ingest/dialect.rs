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

//! Delimiter, quote and header detection over a decoded text sample.
//!
//! Every delimiter/quote candidate parses the sample with the `csv` crate so
//! delimiters inside quoted text do not count. The candidate whose per-record
//! field count is most consistent wins.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{ZI_SUPPORTED_DELIMITERS, ZI_SUPPORTED_QUOTES};
use crate::errors::{Result, ZiError};
use crate::ingest::value::{ZiCColumnType, ZiFClassify};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCDialect {
    pub delimiter: char,
    pub quote: char,
    pub has_header: bool,
}

impl Default for ZiCDialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_header: true,
        }
    }
}

impl ZiCDialect {
    #[allow(non_snake_case)]
    pub fn ZiFNew(delimiter: char, quote: char, has_header: bool) -> Result<Self> {
        if delimiter == quote {
            return Err(ZiError::config(format!(
                "delimiter and quote must differ (both {delimiter:?})"
            )));
        }
        Ok(Self {
            delimiter,
            quote,
            has_header,
        })
    }
}

/// Dialect plus the warnings raised while sniffing it.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiCSniffOutcome {
    pub dialect: ZiCDialect,
    /// Modal field count of the sample under the chosen dialect.
    pub columns: usize,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
struct ZiCCandidateScore {
    delimiter: char,
    quote: char,
    modal: usize,
    consistency: f64,
    variance: f64,
}

impl ZiCCandidateScore {
    fn compare(&self, other: &Self) -> Ordering {
        const EPS: f64 = 1e-9;
        if (self.consistency - other.consistency).abs() > EPS {
            return self
                .consistency
                .partial_cmp(&other.consistency)
                .unwrap_or(Ordering::Equal);
        }
        if (self.variance - other.variance).abs() > EPS {
            return other
                .variance
                .partial_cmp(&self.variance)
                .unwrap_or(Ordering::Equal);
        }
        self.modal.cmp(&other.modal)
    }

    fn is_viable(&self) -> bool {
        self.modal >= 2 && self.consistency >= 0.5
    }
}

#[derive(Clone, Debug)]
pub struct ZiCDialectSniffer {
    sample_rows: usize,
    max_header_ambiguity: usize,
    delimiter: Option<char>,
    quote: Option<char>,
    has_header: Option<bool>,
}

impl Default for ZiCDialectSniffer {
    fn default() -> Self {
        Self::ZiFNew()
    }
}

impl ZiCDialectSniffer {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self {
            sample_rows: 1000,
            max_header_ambiguity: 0,
            delimiter: None,
            quote: None,
            has_header: None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithSampleRows(mut self, rows: usize) -> Self {
        self.sample_rows = rows.max(1);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithMaxHeaderAmbiguity(mut self, columns: usize) -> Self {
        self.max_header_ambiguity = columns;
        self
    }

    /// Forces parts of the dialect instead of sniffing them.
    #[allow(non_snake_case)]
    pub fn ZiFWithOverrides(
        mut self,
        delimiter: Option<char>,
        quote: Option<char>,
        has_header: Option<bool>,
    ) -> Self {
        self.delimiter = delimiter;
        self.quote = quote;
        self.has_header = has_header;
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFSniff(&self, text: &str) -> Result<ZiCDialect> {
        self.ZiFSniffDetailed(text, false).map(|outcome| outcome.dialect)
    }

    /// Sniffs `text`. When `truncated` is set the sample was cut at the byte
    /// limit and its trailing partial line is ignored.
    #[allow(non_snake_case)]
    pub fn ZiFSniffDetailed(&self, text: &str, truncated: bool) -> Result<ZiCSniffOutcome> {
        let text = if truncated {
            match text.rfind('\n') {
                Some(idx) => &text[..=idx],
                None => text,
            }
        } else {
            text
        };

        if text.trim().is_empty() {
            return Err(ZiError::undetectable_dialect("", "sample is empty"));
        }

        let delimiters: Vec<char> = match self.delimiter {
            Some(d) => vec![d],
            None => ZI_SUPPORTED_DELIMITERS.to_vec(),
        };
        let quotes: Vec<char> = match self.quote {
            Some(q) => vec![q],
            None => ZI_SUPPORTED_QUOTES.to_vec(),
        };

        let mut best: Option<ZiCCandidateScore> = None;
        let mut single_column = true;
        for &delimiter in &delimiters {
            for &quote in &quotes {
                if delimiter == quote {
                    continue;
                }
                let records = self.parse_records(text, delimiter, quote);
                let Some(score) = score_candidate(delimiter, quote, &records) else {
                    continue;
                };
                log::debug!(
                    "dialect candidate {:?}/{:?}: modal={} consistency={:.2} variance={:.2}",
                    delimiter,
                    quote,
                    score.modal,
                    score.consistency,
                    score.variance
                );
                if score.modal != 1 {
                    single_column = false;
                }
                let forced = self.delimiter.is_some();
                if !forced && !score.is_viable() {
                    continue;
                }
                let replace = match &best {
                    None => true,
                    Some(current) => score.compare(current) == Ordering::Greater,
                };
                if replace {
                    best = Some(score);
                }
            }
        }

        let (delimiter, quote, columns) = match best {
            Some(score) => (score.delimiter, score.quote, score.modal),
            None if single_column => (
                delimiters[0],
                quotes.iter().copied().find(|q| *q != delimiters[0]).unwrap_or('"'),
                1,
            ),
            None => {
                return Err(ZiError::undetectable_dialect(
                    "",
                    "no delimiter yields a consistent column count",
                ))
            }
        };

        let mut warnings = Vec::new();
        let has_header = match self.has_header {
            Some(forced) => forced,
            None => {
                let records = self.parse_records(text, delimiter, quote);
                let (has_header, warning) = detect_header(&records, self.max_header_ambiguity);
                if let Some(warning) = warning {
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
                has_header
            }
        };

        let dialect = ZiCDialect::ZiFNew(delimiter, quote, has_header)?;
        log::debug!("sniffed dialect {:?}", dialect);
        Ok(ZiCSniffOutcome {
            dialect,
            columns,
            warnings,
        })
    }

    fn parse_records(&self, text: &str, delimiter: char, quote: char) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .quote(quote as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let Ok(record) = result else { break };
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            records.push(record.iter().map(str::to_string).collect());
            if records.len() >= self.sample_rows {
                break;
            }
        }
        records
    }
}

fn score_candidate(delimiter: char, quote: char, records: &[Vec<String>]) -> Option<ZiCCandidateScore> {
    if records.is_empty() {
        return None;
    }
    let mut tally: HashMap<usize, usize> = HashMap::new();
    for record in records {
        *tally.entry(record.len()).or_insert(0) += 1;
    }
    let (modal, modal_count) = tally
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
        .map(|(width, count)| (*width, *count))?;

    let n = records.len() as f64;
    let mean = records.iter().map(|r| r.len() as f64).sum::<f64>() / n;
    let variance = records
        .iter()
        .map(|r| (r.len() as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    Some(ZiCCandidateScore {
        delimiter,
        quote,
        modal,
        consistency: modal_count as f64 / n,
        variance,
    })
}

/// Decides whether the first record is a header.
fn detect_header(records: &[Vec<String>], max_ambiguity: usize) -> (bool, Option<String>) {
    let Some((first, rest)) = records.split_first() else {
        return (false, None);
    };

    let numeric_first = first.iter().any(|cell| {
        matches!(
            ZiFClassify(cell),
            Some(ZiCColumnType::Integer) | Some(ZiCColumnType::Real)
        )
    });
    if numeric_first {
        return (false, None);
    }

    let mut typed_columns = 0usize;
    let mut header_votes = 0usize;
    let mut data_votes = 0usize;
    let mut undecided = 0usize;

    for (col, head) in first.iter().enumerate() {
        let later: Vec<&str> = rest
            .iter()
            .filter_map(|row| row.get(col))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .collect();

        let head_type = ZiFClassify(head);
        if head_type.is_none() || later.is_empty() {
            undecided += 1;
            continue;
        }
        if head_type != Some(ZiCColumnType::Text) {
            data_votes += 1;
            continue;
        }

        let typed = later
            .iter()
            .filter(|cell| ZiFClassify(cell) != Some(ZiCColumnType::Text))
            .count();
        if typed * 2 > later.len() {
            typed_columns += 1;
            continue;
        }

        let first_len = later[0].chars().count();
        if later.iter().all(|cell| cell.chars().count() == first_len) {
            if head.trim().chars().count() != first_len {
                header_votes += 1;
            } else {
                data_votes += 1;
            }
        } else {
            undecided += 1;
        }
    }

    if typed_columns > 0 {
        return (true, None);
    }

    let has_header = header_votes >= data_votes;
    let warning = (undecided > max_ambiguity).then(|| {
        format!(
            "header presence undecidable for {} of {} columns; assuming {}",
            undecided,
            first.len(),
            if has_header { "a header row" } else { "no header row" }
        )
    });
    (has_header, warning)
}
