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

//! Pull-based CSV tokenizer.
//!
//! The parser works on decoded characters, keeps only the record being built
//! and reports the physical line on which every record starts. An
//! unterminated quote at end of input ends the stream with `MalformedRow`.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::ingest::dialect::ZiCDialect;
use crate::ingest::encoding::ZiCTextDecoder;

/// Raw string fields of one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCRawRow {
    /// 1-based physical line where the record starts.
    pub line_number: usize,
    pub fields: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZiCFieldState {
    Start,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

pub struct ZiCRowParser<R> {
    decoder: ZiCTextDecoder<R>,
    delimiter: char,
    quote: char,
    max_record_bytes: usize,
    /// Line the next character belongs to.
    line: usize,
    pending: Option<char>,
    finished: bool,
    rows_parsed: usize,
}

impl<R: BufRead> ZiCRowParser<R> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(decoder: ZiCTextDecoder<R>, dialect: &ZiCDialect) -> Self {
        Self {
            decoder,
            delimiter: dialect.delimiter,
            quote: dialect.quote,
            max_record_bytes: usize::MAX,
            line: 1,
            pending: None,
            finished: false,
            rows_parsed: 0,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithMaxRecordBytes(mut self, limit: usize) -> Self {
        self.max_record_bytes = limit.max(1);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFRowsParsed(&self) -> usize {
        self.rows_parsed
    }

    #[allow(non_snake_case)]
    pub fn ZiFDecodeReplacements(&self) -> usize {
        self.decoder.ZiFReplacements()
    }

    fn next_char(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.pending.take() {
            return Ok(Some(c));
        }
        Ok(self.decoder.ZiFNextChar()?)
    }

    /// Consumes a line terminator whose first character was `c`.
    fn end_of_line(&mut self, c: char) -> Result<()> {
        if c == '\r' {
            match self.next_char()? {
                Some('\n') | None => {}
                Some(other) => self.pending = Some(other),
            }
        }
        self.line += 1;
        Ok(())
    }

    /// Reads one record, `Ok(None)` at a clean end of input.
    ///
    /// Empty physical lines are skipped. A line holding only whitespace or
    /// an empty quoted field is a record.
    #[allow(non_snake_case)]
    pub fn ZiFReadRow(&mut self) -> Result<Option<ZiCRawRow>> {
        if self.finished {
            return Ok(None);
        }
        match self.read_record()? {
            Some(row) => {
                self.rows_parsed += 1;
                Ok(Some(row))
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<ZiCRawRow>> {
        let mut start_line = self.line;
        let mut fields: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut state = ZiCFieldState::Start;
        let mut record_bytes = 0usize;
        let mut seen_any = false;

        loop {
            let c = match self.next_char()? {
                Some(c) => c,
                None => {
                    if state == ZiCFieldState::Quoted {
                        self.finished = true;
                        return Err(ZiError::malformed_row(
                            start_line,
                            "unterminated quoted field at end of input",
                        ));
                    }
                    if !seen_any {
                        return Ok(None);
                    }
                    fields.push(field);
                    return Ok(Some(ZiCRawRow {
                        line_number: start_line,
                        fields,
                    }));
                }
            };
            seen_any = true;

            record_bytes += c.len_utf8();
            if record_bytes > self.max_record_bytes {
                self.finished = true;
                return Err(ZiError::malformed_row(
                    start_line,
                    format!("record exceeds {} bytes", self.max_record_bytes),
                ));
            }

            match state {
                ZiCFieldState::Quoted => {
                    if c == self.quote {
                        state = ZiCFieldState::QuoteInQuoted;
                    } else if c == '\n' || c == '\r' {
                        // Embedded line breaks are normalized to '\n'.
                        self.end_of_line(c)?;
                        field.push('\n');
                    } else {
                        field.push(c);
                    }
                }
                ZiCFieldState::QuoteInQuoted if c == self.quote => {
                    field.push(c);
                    state = ZiCFieldState::Quoted;
                }
                _ if c == self.delimiter => {
                    fields.push(std::mem::take(&mut field));
                    state = ZiCFieldState::Start;
                }
                ZiCFieldState::Start if (c == '\n' || c == '\r') && fields.is_empty() => {
                    self.end_of_line(c)?;
                    start_line = self.line;
                    record_bytes = 0;
                    seen_any = false;
                }
                _ if c == '\n' || c == '\r' => {
                    self.end_of_line(c)?;
                    fields.push(field);
                    return Ok(Some(ZiCRawRow {
                        line_number: start_line,
                        fields,
                    }));
                }
                ZiCFieldState::Start if c == self.quote => {
                    state = ZiCFieldState::Quoted;
                }
                _ => {
                    field.push(c);
                    state = ZiCFieldState::Unquoted;
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for ZiCRowParser<R> {
    type Item = Result<ZiCRawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.ZiFReadRow() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
