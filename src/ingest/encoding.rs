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

//! Character encoding detection and incremental decoding.
//!
//! Detection never fails: an uncertain guess degrades to UTF-8 with
//! replacement characters and a warning instead of an error.

use std::io::{self, BufRead};

use encoding_rs::{Decoder, Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1251, WINDOWS_1252};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCEncoding {
    /// WHATWG name of the encoding, e.g. "UTF-8" or "windows-1251".
    pub name: String,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
}

impl ZiCEncoding {
    #[allow(non_snake_case)]
    pub fn ZiFNew(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Resolves the name to an `encoding_rs` encoding, defaulting to UTF-8.
    #[allow(non_snake_case)]
    pub fn ZiFResolve(&self) -> &'static Encoding {
        Encoding::for_label(self.name.as_bytes()).unwrap_or(UTF_8)
    }
}

/// Result of a detection: always an encoding, sometimes a warning.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiCEncodingOutcome {
    pub encoding: ZiCEncoding,
    pub warning: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ZiCEncodingDetector {
    threshold: f64,
}

impl Default for ZiCEncodingDetector {
    fn default() -> Self {
        Self::ZiFNew(0.7)
    }
}

impl ZiCEncodingDetector {
    #[allow(non_snake_case)]
    pub fn ZiFNew(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Detects the encoding of a complete input, falling back to UTF-8 when
    /// the best guess is below the confidence threshold.
    #[allow(non_snake_case)]
    pub fn ZiFDetect(&self, sample: &[u8]) -> ZiCEncodingOutcome {
        self.ZiFDetectSample(sample, false)
    }

    /// Same as [`Self::ZiFDetect`]; `truncated` tells whether `sample` was cut
    /// from a longer stream, in which case a multi-byte UTF-8 sequence split
    /// by the cut is tolerated.
    #[allow(non_snake_case)]
    pub fn ZiFDetectSample(&self, sample: &[u8], truncated: bool) -> ZiCEncodingOutcome {
        let guess = Self::ZiFGuess(sample, truncated);
        if guess.confidence >= self.threshold {
            log::debug!(
                "detected encoding {} (confidence {:.2})",
                guess.name,
                guess.confidence
            );
            return ZiCEncodingOutcome {
                encoding: guess,
                warning: None,
            };
        }

        let warning = format!(
            "encoding detection uncertain (best guess {} with confidence {:.2} < {:.2}); decoding as UTF-8 with replacement",
            guess.name, guess.confidence, self.threshold
        );
        log::warn!("{}", warning);
        ZiCEncodingOutcome {
            encoding: ZiCEncoding::ZiFNew(UTF_8.name(), guess.confidence),
            warning: Some(warning),
        }
    }

    /// Best guess for `sample` without applying the threshold.
    #[allow(non_snake_case)]
    pub fn ZiFGuess(sample: &[u8], truncated: bool) -> ZiCEncoding {
        if let Some((encoding, _)) = Encoding::for_bom(sample) {
            return ZiCEncoding::ZiFNew(encoding.name(), 1.0);
        }
        // NUL bytes are valid UTF-8, so UTF-16 is checked first.
        if let Some(guess) = guess_utf16(sample) {
            return guess;
        }
        if is_utf8_prefix(sample, truncated) {
            return ZiCEncoding::ZiFNew(UTF_8.name(), 1.0);
        }
        guess_single_byte(sample)
    }
}

/// Valid UTF-8. A multi-byte sequence cut off by the end is allowed only
/// when the sample is a prefix of a longer stream.
fn is_utf8_prefix(sample: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(err) => {
            truncated && err.error_len().is_none() && sample.len() - err.valid_up_to() < 4
        }
    }
}

fn guess_utf16(sample: &[u8]) -> Option<ZiCEncoding> {
    if sample.len() < 4 {
        return None;
    }
    let pairs = sample.len() / 2;
    let even_nuls = sample.iter().step_by(2).filter(|b| **b == 0).count();
    let odd_nuls = sample.iter().skip(1).step_by(2).filter(|b| **b == 0).count();
    let (lane_nuls, encoding) = if odd_nuls >= even_nuls {
        (odd_nuls, UTF_16LE)
    } else {
        (even_nuls, UTF_16BE)
    };
    let share = lane_nuls as f64 / pairs as f64;
    if share < 0.3 {
        return None;
    }
    Some(ZiCEncoding::ZiFNew(encoding.name(), 0.5 + share / 2.0))
}

fn guess_single_byte(sample: &[u8]) -> ZiCEncoding {
    let ascii_letters = sample.iter().filter(|b| b.is_ascii_alphabetic()).count();
    let high_letters = sample.iter().filter(|b| **b >= 0xC0).count();
    // Bytes without a mapping in windows-1252.
    let undefined_1252 = sample
        .iter()
        .filter(|b| matches!(**b, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D))
        .count();

    let letters = ascii_letters + high_letters;
    if letters == 0 {
        return ZiCEncoding::ZiFNew(WINDOWS_1252.name(), 0.3);
    }

    let ratio = high_letters as f64 / letters as f64;
    if ratio >= 0.5 {
        ZiCEncoding::ZiFNew(WINDOWS_1251.name(), 0.5 + ratio / 2.0)
    } else {
        let penalty = if undefined_1252 > 0 { 0.3 } else { 0.0 };
        ZiCEncoding::ZiFNew(WINDOWS_1252.name(), 1.0 - ratio - penalty)
    }
}

/// Incremental decoder turning a byte source into characters.
///
/// Malformed sequences are replaced by U+FFFD and counted. A byte order mark
/// at the start of the stream overrides the configured encoding and is
/// stripped.
pub struct ZiCTextDecoder<R> {
    inner: R,
    decoder: Decoder,
    buffer: String,
    pos: usize,
    finished: bool,
    replacements: usize,
}

impl<R: BufRead> ZiCTextDecoder<R> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            buffer: String::new(),
            pos: 0,
            finished: false,
            replacements: 0,
        }
    }

    /// Number of decode calls that had to substitute replacement characters.
    #[allow(non_snake_case)]
    pub fn ZiFReplacements(&self) -> usize {
        self.replacements
    }

    /// Returns the next character, or `None` at end of stream.
    #[allow(non_snake_case)]
    pub fn ZiFNextChar(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(c) = self.buffer[self.pos..].chars().next() {
                self.pos += c.len_utf8();
                return Ok(Some(c));
            }
            if self.finished {
                return Ok(None);
            }
            self.refill()?;
        }
    }

    fn refill(&mut self) -> io::Result<()> {
        self.buffer.clear();
        self.pos = 0;

        let (read, last) = {
            let bytes = self.inner.fill_buf()?;
            let last = bytes.is_empty();
            let needed = self
                .decoder
                .max_utf8_buffer_length(bytes.len())
                .unwrap_or(bytes.len() * 3 + 16);
            self.buffer.reserve(needed);
            let (_, read, had_errors) = self.decoder.decode_to_string(bytes, &mut self.buffer, last);
            if had_errors {
                self.replacements += 1;
            }
            (read, last)
        };
        self.inner.consume(read);

        if last {
            self.finished = true;
        }
        Ok(())
    }
}

/// Decodes a whole byte sample, dropping a trailing partial character.
#[allow(non_snake_case)]
pub fn ZiFDecodeSample(sample: &[u8], encoding: &'static Encoding) -> String {
    let mut decoder = encoding.new_decoder();
    let mut text = String::with_capacity(
        decoder
            .max_utf8_buffer_length(sample.len())
            .unwrap_or(sample.len() * 3 + 16),
    );
    let _ = decoder.decode_to_string(sample, &mut text, false);
    text
}
