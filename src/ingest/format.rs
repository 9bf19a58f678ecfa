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

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};

/// Byte source handed down the pipeline.
pub type ZiCSource = Box<dyn BufRead + Send>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiCCompression {
    None,
    Gzip,
}

impl ZiCCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCCompression::None => "none",
            ZiCCompression::Gzip => "gzip",
        }
    }
}

/// Reader wrapper counting raw bytes pulled from the underlying file.
pub struct ZiCCountingReader<R> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> ZiCCountingReader<R> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(inner: R, counter: Arc<AtomicU64>) -> Self {
        Self { inner, counter }
    }
}

impl<R: Read> Read for ZiCCountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// An opened, decompressed byte stream plus what was learned while opening it.
pub struct ZiCOpenedSource {
    pub source: ZiCSource,
    pub compression: ZiCCompression,
    /// Raw (compressed) bytes consumed from the file so far.
    pub bytes_read: Arc<AtomicU64>,
    /// Size of the file on disk, when known.
    pub total_bytes: Option<u64>,
    pub warnings: Vec<String>,
}

/// Detects gzip framing and exposes a uniform decompressed byte stream.
#[derive(Clone, Debug)]
pub struct ZiCDecompressor {
    verify_archive: bool,
}

impl Default for ZiCDecompressor {
    fn default() -> Self {
        Self::ZiFNew()
    }
}

impl ZiCDecompressor {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self {
            verify_archive: true,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithVerify(mut self, verify: bool) -> Self {
        self.verify_archive = verify;
        self
    }

    /// Classifies the leading bytes of a stream.
    #[allow(non_snake_case)]
    pub fn ZiFDetectCompression(head: &[u8]) -> ZiCCompression {
        if head.len() >= 2 && head[..2] == GZIP_MAGIC {
            ZiCCompression::Gzip
        } else {
            ZiCCompression::None
        }
    }

    /// Whether the file name carries a `.gz` suffix.
    #[allow(non_snake_case)]
    pub fn ZiFHasGzipExtension(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("gz"))
            .unwrap_or(false)
    }

    /// Opens `path` and returns its decompressed contents as a byte stream.
    #[allow(non_snake_case)]
    pub fn ZiFOpen(&self, path: &Path) -> Result<ZiCOpenedSource> {
        let display = path.display().to_string();
        let mut warnings = Vec::new();

        let file = File::open(path).map_err(|err| ZiError::io(&display, err))?;
        let total_bytes = file.metadata().ok().map(|m| m.len());
        let counter = Arc::new(AtomicU64::new(0));
        let mut raw = BufReader::new(ZiCCountingReader::ZiFNew(file, Arc::clone(&counter)));

        let compression = {
            let head = raw.fill_buf().map_err(|err| ZiError::io(&display, err))?;
            Self::ZiFDetectCompression(head)
        };

        if compression == ZiCCompression::None && Self::ZiFHasGzipExtension(path) {
            let message = format!(
                "'{display}' is named like a gzip archive but has no gzip header; reading it as plain text"
            );
            log::warn!("{}", message);
            warnings.push(message);
        }

        let source: ZiCSource = match compression {
            ZiCCompression::None => Box::new(raw),
            ZiCCompression::Gzip => {
                if self.verify_archive {
                    Self::verify_gzip(path, &display)?;
                }
                let mut decoded = BufReader::new(MultiGzDecoder::new(raw));
                decoded
                    .fill_buf()
                    .map_err(|err| ZiError::corrupt_archive(&display, err.to_string()))?;
                Box::new(decoded)
            }
        };

        log::debug!(
            "opened '{}' (compression={}, size={:?})",
            display,
            compression.as_str(),
            total_bytes
        );

        Ok(ZiCOpenedSource {
            source,
            compression,
            bytes_read: counter,
            total_bytes,
            warnings,
        })
    }

    /// Wraps an already-open reader, sniffing gzip framing from its first bytes.
    #[allow(non_snake_case)]
    pub fn ZiFWrap<R: Read + Send + 'static>(&self, reader: R) -> Result<ZiCOpenedSource> {
        let counter = Arc::new(AtomicU64::new(0));
        let mut raw = BufReader::new(ZiCCountingReader::ZiFNew(reader, Arc::clone(&counter)));
        let compression = Self::ZiFDetectCompression(raw.fill_buf()?);

        let source: ZiCSource = match compression {
            ZiCCompression::None => Box::new(raw),
            ZiCCompression::Gzip => {
                let mut decoded = BufReader::new(MultiGzDecoder::new(raw));
                decoded
                    .fill_buf()
                    .map_err(|err| ZiError::corrupt_archive("", err.to_string()))?;
                Box::new(decoded)
            }
        };

        Ok(ZiCOpenedSource {
            source,
            compression,
            bytes_read: counter,
            total_bytes: None,
            warnings: Vec::new(),
        })
    }

    fn verify_gzip(path: &Path, display: &str) -> Result<()> {
        let file = File::open(path).map_err(|err| ZiError::io(display, err))?;
        let mut decoder = MultiGzDecoder::new(BufReader::new(file));
        let size = io::copy(&mut decoder, &mut io::sink())
            .map_err(|err| ZiError::corrupt_archive(display, err.to_string()))?;
        log::debug!("verified gzip archive '{}' ({} bytes decompressed)", display, size);
        Ok(())
    }
}
