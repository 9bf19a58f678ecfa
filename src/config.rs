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

//! # Ingestion Configuration
//!
//! Detection thresholds and user overrides are carried in an explicit
//! [`ZiCIngestConfig`] value handed to the ingestor. There is no global state:
//! two ingestions with different configurations never observe each other.
//!
//! The defaults make the pipeline usable with zero configuration. Hosts that
//! persist settings as JSON can rebuild a configuration with
//! [`ZiCIngestConfigBuilder::ZiFFromJson`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Delimiters the sniffer considers and overrides may select.
pub const ZI_SUPPORTED_DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Quote characters the sniffer considers.
pub const ZI_SUPPORTED_QUOTES: [char; 2] = ['"', '\''];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCIngestConfig {
    /// Bytes of decompressed input used for encoding and dialect detection.
    pub sample_bytes: usize,
    /// Parsed data rows used for type inference.
    pub sample_rows: usize,
    /// Minimum detector confidence before falling back to UTF-8.
    pub encoding_confidence_threshold: f64,
    /// Undecidable header columns tolerated before the header guess is reported.
    pub max_header_ambiguity: usize,
    /// Forced delimiter, bypassing sniffing.
    pub delimiter: Option<char>,
    /// Forced quote character, bypassing sniffing.
    pub quote: Option<char>,
    /// Forced header presence, bypassing sniffing.
    pub has_header: Option<bool>,
    /// Forced encoding label (e.g. "windows-1251"), bypassing detection.
    pub encoding: Option<String>,
    /// Decompress gzip input once up front so corrupt archives fail early.
    pub verify_archive: bool,
    /// Upper bound for a single record, in bytes of decoded text.
    pub max_record_bytes: usize,
    /// Streaming warnings kept before further ones are only counted.
    pub max_warnings: usize,
    /// Records between two progress callbacks.
    pub progress_interval: usize,
    /// Records returned by one `next_batch` call.
    pub batch_size: usize,
}

impl Default for ZiCIngestConfig {
    fn default() -> Self {
        Self {
            sample_bytes: 64 * 1024,
            sample_rows: 1000,
            encoding_confidence_threshold: 0.7,
            max_header_ambiguity: 0,
            delimiter: None,
            quote: None,
            has_header: None,
            encoding: None,
            verify_archive: true,
            max_record_bytes: 8 * 1024 * 1024,
            max_warnings: 100,
            progress_interval: 10_000,
            batch_size: 1000,
        }
    }
}

impl ZiCIngestConfig {
    /// Checks value ranges and override consistency.
    #[allow(non_snake_case)]
    pub fn ZiFValidate(&self) -> Result<()> {
        if self.sample_bytes == 0 {
            return Err(ZiError::config("sample_bytes must be greater than zero"));
        }
        if self.sample_rows == 0 {
            return Err(ZiError::config("sample_rows must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.encoding_confidence_threshold) {
            return Err(ZiError::config(format!(
                "encoding_confidence_threshold must be within [0, 1], got {}",
                self.encoding_confidence_threshold
            )));
        }
        if self.max_record_bytes == 0 {
            return Err(ZiError::config("max_record_bytes must be greater than zero"));
        }
        if self.batch_size == 0 {
            return Err(ZiError::config("batch_size must be greater than zero"));
        }
        if let Some(delimiter) = self.delimiter {
            if !ZI_SUPPORTED_DELIMITERS.contains(&delimiter) {
                return Err(ZiError::config(format!(
                    "unsupported delimiter {delimiter:?}; expected one of ',', ';', '\\t'"
                )));
            }
        }
        if let Some(quote) = self.quote {
            if !ZI_SUPPORTED_QUOTES.contains(&quote) {
                return Err(ZiError::config(format!(
                    "unsupported quote character {quote:?}"
                )));
            }
            if self.delimiter == Some(quote) {
                return Err(ZiError::config("delimiter and quote must differ"));
            }
        }
        if let Some(label) = &self.encoding {
            if encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none() {
                return Err(ZiError::config(format!("unknown encoding label '{label}'")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZiCIngestConfigBuilder {
    pub sample_bytes: Option<usize>,
    pub sample_rows: Option<usize>,
    pub encoding_confidence_threshold: Option<f64>,
    pub max_header_ambiguity: Option<usize>,
    pub delimiter: Option<char>,
    pub quote: Option<char>,
    pub has_header: Option<bool>,
    pub encoding: Option<String>,
    pub verify_archive: Option<bool>,
    pub max_record_bytes: Option<usize>,
    pub max_warnings: Option<usize>,
    pub progress_interval: Option<usize>,
    pub batch_size: Option<usize>,
}

impl ZiCIngestConfigBuilder {
    #[allow(non_snake_case)]
    pub fn ZiFBuild(self) -> ZiCIngestConfig {
        let base = ZiCIngestConfig::default();
        ZiCIngestConfig {
            sample_bytes: self.sample_bytes.unwrap_or(base.sample_bytes),
            sample_rows: self.sample_rows.unwrap_or(base.sample_rows),
            encoding_confidence_threshold: self
                .encoding_confidence_threshold
                .unwrap_or(base.encoding_confidence_threshold),
            max_header_ambiguity: self
                .max_header_ambiguity
                .unwrap_or(base.max_header_ambiguity),
            delimiter: self.delimiter.or(base.delimiter),
            quote: self.quote.or(base.quote),
            has_header: self.has_header.or(base.has_header),
            encoding: self.encoding.or(base.encoding),
            verify_archive: self.verify_archive.unwrap_or(base.verify_archive),
            max_record_bytes: self.max_record_bytes.unwrap_or(base.max_record_bytes),
            max_warnings: self.max_warnings.unwrap_or(base.max_warnings),
            progress_interval: self.progress_interval.unwrap_or(base.progress_interval),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
        }
    }

    /// Builds and validates a configuration from a JSON object. Missing keys
    /// take their defaults; unknown keys are rejected.
    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> Result<ZiCIngestConfig> {
        let builder: ZiCIngestConfigBuilder = serde_json::from_value(value.clone())
            .map_err(|err| ZiError::config(format!("invalid configuration: {err}")))?;
        let config = builder.ZiFBuild();
        config.ZiFValidate()?;
        Ok(config)
    }
}
