//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::collections::VecDeque;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::config::ZiCIngestConfig;
use crate::errors::{Result, ZiError};
use crate::ingest::dialect::{ZiCDialect, ZiCDialectSniffer};
use crate::ingest::encoding::{ZiCEncoding, ZiCEncodingDetector, ZiCTextDecoder, ZiFDecodeSample};
use crate::ingest::format::{ZiCCompression, ZiCDecompressor, ZiCOpenedSource, ZiCSource};
use crate::ingest::infer::{ZiCSchema, ZiCTypeInferencer};
use crate::ingest::materialize::ZiCRowMaterializer;
use crate::ingest::parser::{ZiCRawRow, ZiCRowParser};
use crate::log::{ZiCLogLevel, ZiCLogger};
use crate::metrics::ZiCIngestSummary;
use crate::record::{ZiCRecord, ZiCRecordBatch};

pub type ProgressCallback = Arc<dyn Fn(ProgressInfo) + Send + Sync>;

#[derive(Clone, Debug)]
pub struct ProgressInfo {
    pub records_read: usize,
    pub bytes_read: usize,
    pub total_bytes: Option<usize>,
    pub current_file: String,
}

/// Turns a CSV or gzip-compressed CSV source into a typed record stream.
pub struct ZiCIngestor {
    config: ZiCIngestConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Default for ZiCIngestor {
    fn default() -> Self {
        Self::ZiFNew()
    }
}

impl ZiCIngestor {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self {
            config: ZiCIngestConfig::default(),
            progress_callback: None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithConfig(mut self, config: ZiCIngestConfig) -> Self {
        self.config = config;
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithProgress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFConfig(&self) -> &ZiCIngestConfig {
        &self.config
    }

    /// Opens `path` and prepares its record stream.
    ///
    /// Fails before any record is produced on configuration, I/O, archive
    /// or dialect errors. Row-level problems surface through the iterator.
    #[allow(non_snake_case)]
    pub fn ZiFIngestPath(&self, path: &Path) -> Result<ZiCIngestResult> {
        self.config.ZiFValidate()?;
        let display = path.display().to_string();
        let opened = ZiCDecompressor::ZiFNew()
            .ZiFWithVerify(self.config.verify_archive)
            .ZiFOpen(path)?;
        self.ingest_opened(opened, display, ZiFLayerName(path))
    }

    /// Same as [`Self::ZiFIngestPath`] for an already-open byte source;
    /// `name` is used for error messages and the layer name.
    #[allow(non_snake_case)]
    pub fn ZiFIngestReader<R: Read + Send + 'static>(
        &self,
        reader: R,
        name: &str,
    ) -> Result<ZiCIngestResult> {
        self.config.ZiFValidate()?;
        let opened = ZiCDecompressor::ZiFNew()
            .ZiFWrap(reader)
            .map_err(|err| err.ZiFAtPath(name))?;
        self.ingest_opened(opened, name.to_string(), ZiFLayerName(Path::new(name)))
    }

    fn ingest_opened(
        &self,
        opened: ZiCOpenedSource,
        display: String,
        layer_name: String,
    ) -> Result<ZiCIngestResult> {
        let config = &self.config;
        let ZiCOpenedSource {
            mut source,
            compression,
            bytes_read,
            total_bytes,
            mut warnings,
        } = opened;

        let limit = config.sample_bytes as u64;
        let mut sample = Vec::with_capacity(config.sample_bytes.min(1 << 20));
        (&mut source)
            .take(limit)
            .read_to_end(&mut sample)
            .map_err(|err| stream_error(compression, &display, err.into()))?;
        let truncated = sample.len() as u64 == limit
            && !source
                .fill_buf()
                .map_err(|err| stream_error(compression, &display, err.into()))?
                .is_empty();

        let encoding = match &config.encoding {
            Some(label) => {
                let forced = encoding_rs::Encoding::for_label(label.trim().as_bytes())
                    .ok_or_else(|| ZiError::config(format!("unknown encoding label '{label}'")))?;
                ZiCEncoding::ZiFNew(forced.name(), 1.0)
            }
            None => {
                let outcome = ZiCEncodingDetector::ZiFNew(config.encoding_confidence_threshold)
                    .ZiFDetectSample(&sample, truncated);
                warnings.extend(outcome.warning);
                outcome.encoding
            }
        };
        let resolved = encoding.ZiFResolve();

        let text = ZiFDecodeSample(&sample, resolved);
        let sniffed = ZiCDialectSniffer::ZiFNew()
            .ZiFWithSampleRows(config.sample_rows + 1)
            .ZiFWithMaxHeaderAmbiguity(config.max_header_ambiguity)
            .ZiFWithOverrides(config.delimiter, config.quote, config.has_header)
            .ZiFSniffDetailed(&text, truncated)
            .map_err(|err| err.ZiFAtPath(&display))?;
        warnings.extend(sniffed.warnings);
        let dialect = sniffed.dialect;
        let sniffed_columns = sniffed.columns;
        drop(text);

        let chained: ZiCSource = Box::new(Cursor::new(sample).chain(source));
        let decoder = ZiCTextDecoder::ZiFNew(chained, resolved);
        let mut parser =
            ZiCRowParser::ZiFNew(decoder, &dialect).ZiFWithMaxRecordBytes(config.max_record_bytes);

        let wanted = config.sample_rows + usize::from(dialect.has_header);
        let mut buffered: VecDeque<ZiCRawRow> = VecDeque::with_capacity(wanted.min(4096));
        let mut pending_error = None;
        while buffered.len() < wanted {
            match parser.ZiFReadRow() {
                Ok(Some(row)) => buffered.push_back(row),
                Ok(None) => break,
                Err(err) => {
                    let err = stream_error(compression, &display, err);
                    if err.ZiFIsFatal() {
                        return Err(err);
                    }
                    pending_error = Some(err);
                    break;
                }
            }
        }

        let schema = ZiCTypeInferencer::ZiFNew()
            .ZiFWithFallbackWidth(sniffed_columns.max(1))
            .ZiFInfer(&dialect, buffered.make_contiguous());
        if dialect.has_header {
            buffered.pop_front();
        }

        log::info!(
            "ingesting '{}' as layer '{}': compression={}, encoding={} ({:.2}), delimiter={:?}, header={}, columns={}",
            display,
            layer_name,
            compression.as_str(),
            encoding.name,
            encoding.confidence,
            dialect.delimiter,
            dialect.has_header,
            schema.len()
        );

        let records = ZiCRecordIterator {
            parser: Some(parser),
            buffered,
            pending_error,
            deferred_error: None,
            materializer: ZiCRowMaterializer::ZiFNew(&schema),
            path: display.clone(),
            encoding_name: encoding.name.clone(),
            compression,
            bytes_read,
            total_bytes,
            progress_callback: self.progress_callback.clone(),
            progress_interval: config.progress_interval,
            batch_size: config.batch_size,
            max_warnings: config.max_warnings,
            warnings: Vec::new(),
            summary: ZiCIngestSummary::default(),
            last_reported: None,
            error_count: 0,
            exhausted: false,
        };

        Ok(ZiCIngestResult {
            path: display,
            layer_name,
            compression,
            encoding,
            dialect,
            schema,
            warnings,
            records,
        })
    }
}

/// Maps a stream failure to the error category of its source.
fn stream_error(compression: ZiCCompression, display: &str, err: ZiError) -> ZiError {
    match err {
        ZiError::Io { message, .. } if compression == ZiCCompression::Gzip => {
            ZiError::corrupt_archive(display, message)
        }
        other => other.ZiFAtPath(display),
    }
}

/// Layer name for a file: its name without `.gz` and `.csv` suffixes.
#[allow(non_snake_case)]
pub fn ZiFLayerName(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut name = file_name.as_str();
    for suffix in [".gz", ".csv"] {
        if name.len() > suffix.len() && name.to_ascii_lowercase().ends_with(suffix) {
            name = &name[..name.len() - suffix.len()];
        }
    }
    if name.is_empty() {
        "layer".to_string()
    } else {
        name.to_string()
    }
}

/// Outcome of a successful ingestion setup.
pub struct ZiCIngestResult {
    pub path: String,
    pub layer_name: String,
    pub compression: ZiCCompression,
    pub encoding: ZiCEncoding,
    pub dialect: ZiCDialect,
    pub schema: ZiCSchema,
    /// Warnings raised while opening and sniffing the source.
    pub warnings: Vec<String>,
    /// Lazy record stream owning the open source.
    pub records: ZiCRecordIterator,
}

impl ZiCIngestResult {
    /// Setup warnings followed by the streaming warnings seen so far.
    #[allow(non_snake_case)]
    pub fn ZiFAllWarnings(&self) -> Vec<String> {
        let mut all = self.warnings.clone();
        all.extend(self.records.ZiFWarnings().iter().cloned());
        all
    }
}

/// Pull iterator over materialized records.
///
/// Replays the rows buffered for inference, then keeps parsing the source.
/// The first error ends the stream; the source is released at that point,
/// at the end of input, on [`Self::ZiFClose`] or on drop.
pub struct ZiCRecordIterator {
    parser: Option<ZiCRowParser<ZiCSource>>,
    buffered: VecDeque<ZiCRawRow>,
    pending_error: Option<ZiError>,
    deferred_error: Option<ZiError>,
    materializer: ZiCRowMaterializer,
    path: String,
    encoding_name: String,
    compression: ZiCCompression,
    bytes_read: Arc<AtomicU64>,
    total_bytes: Option<u64>,
    progress_callback: Option<ProgressCallback>,
    progress_interval: usize,
    batch_size: usize,
    max_warnings: usize,
    warnings: Vec<String>,
    summary: ZiCIngestSummary,
    /// Record count of the last progress report.
    last_reported: Option<usize>,
    error_count: usize,
    exhausted: bool,
}

impl ZiCRecordIterator {
    /// Up to `batch_size` records, `Ok(None)` once the stream is exhausted.
    pub fn next_batch(&mut self) -> Result<Option<ZiCRecordBatch>> {
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.next() {
                Some(Ok(record)) => batch.push(record),
                Some(Err(err)) => {
                    if batch.is_empty() {
                        return Err(err);
                    }
                    self.deferred_error = Some(err);
                    break;
                }
                None => break,
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }

    /// Drains the remaining records, stopping at the first error.
    #[allow(non_snake_case)]
    pub fn ZiFCollectRecords(&mut self) -> Result<ZiCRecordBatch> {
        self.by_ref().collect()
    }

    /// Releases the source; later calls to `next` return `None`.
    #[allow(non_snake_case)]
    pub fn ZiFClose(&mut self) {
        self.buffered.clear();
        self.pending_error = None;
        self.parser = None;
        self.exhausted = true;
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsOpen(&self) -> bool {
        self.parser.is_some()
    }

    #[allow(non_snake_case)]
    pub fn ZiFWarnings(&self) -> &[String] {
        &self.warnings
    }

    #[allow(non_snake_case)]
    pub fn ZiFSummary(&self) -> &ZiCIngestSummary {
        &self.summary
    }

    pub fn records_read(&self) -> usize {
        self.summary.rows_imported
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read.load(Ordering::Relaxed) as usize
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    fn push_warning(&mut self, warning: String) {
        log::warn!("{}: {}", self.path, warning);
        if self.warnings.len() < self.max_warnings {
            self.warnings.push(warning);
        } else {
            self.summary.suppressed_warnings += 1;
        }
    }

    fn fail(&mut self, err: ZiError) -> ZiError {
        let err = stream_error(self.compression, &self.path, err);
        log::warn!("record stream of '{}' ended early: {}", self.path, err);
        self.summary.ZiFObserveError(&err);
        self.error_count += 1;
        self.finish();
        err
    }

    fn finish(&mut self) {
        if self.exhausted {
            return;
        }
        self.exhausted = true;
        if let Some(parser) = self.parser.take() {
            let replaced = parser.ZiFDecodeReplacements();
            if replaced > 0 {
                self.push_warning(format!(
                    "invalid byte sequences were replaced with U+FFFD while decoding as {}",
                    self.encoding_name
                ));
            }
        }
        if self.last_reported != Some(self.summary.rows_imported) {
            self.report_progress();
        }

        let mut fields = vec![("file".to_string(), Value::String(self.path.clone()))];
        if let Value::Object(map) = self.summary.ZiFAsJson() {
            fields.extend(map);
        }
        ZiCLogger::ZiFEvent(
            ZiCLogLevel::Info,
            "zidrop::ingest",
            &self.summary.ZiFDescribe(),
            fields,
        );
    }

    fn report_progress(&mut self) {
        self.last_reported = Some(self.summary.rows_imported);
        if let Some(callback) = &self.progress_callback {
            callback(ProgressInfo {
                records_read: self.summary.rows_imported,
                bytes_read: self.bytes_read(),
                total_bytes: self.total_bytes.map(|t| t as usize),
                current_file: self.path.clone(),
            });
        }
    }
}

impl Iterator for ZiCRecordIterator {
    type Item = Result<ZiCRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let raw = match self.buffered.pop_front() {
            Some(row) => row,
            None => {
                if let Some(err) = self.pending_error.take() {
                    return Some(Err(self.fail(err)));
                }
                let next = match self.parser.as_mut() {
                    Some(parser) => parser.ZiFReadRow(),
                    None => Ok(None),
                };
                match next {
                    Ok(Some(row)) => row,
                    Ok(None) => {
                        self.finish();
                        return None;
                    }
                    Err(err) => return Some(Err(self.fail(err))),
                }
            }
        };

        let (record, warning) = self.materializer.ZiFMaterialize(raw);
        if let Some(warning) = warning {
            self.summary.width_warnings += 1;
            self.push_warning(warning);
        }
        self.summary.ZiFObserve(&record);

        if self.progress_interval > 0 && self.summary.rows_imported % self.progress_interval == 0 {
            self.report_progress();
        }
        Some(Ok(record))
    }
}
