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

use std::io::Cursor;

use encoding_rs::UTF_8;
use zidrop::errors::{Result, ZiError};
use zidrop::ingest::dialect::ZiCDialect;
use zidrop::ingest::encoding::ZiCTextDecoder;
use zidrop::ingest::parser::{ZiCRawRow, ZiCRowParser};

fn ZiFTParser(text: &str, delimiter: char) -> ZiCRowParser<Cursor<Vec<u8>>> {
    let dialect = ZiCDialect::ZiFNew(delimiter, '"', false).expect("dialect");
    let decoder = ZiCTextDecoder::ZiFNew(Cursor::new(text.as_bytes().to_vec()), UTF_8);
    ZiCRowParser::ZiFNew(decoder, &dialect)
}

fn ZiFTRows(text: &str, delimiter: char) -> Vec<Result<ZiCRawRow>> {
    ZiFTParser(text, delimiter).collect()
}

fn ZiFTFields(row: &Result<ZiCRawRow>) -> Vec<&str> {
    row.as_ref()
        .expect("row")
        .fields
        .iter()
        .map(String::as_str)
        .collect()
}

#[test]
fn ZiFTParserHandlesQuotingRules() {
    let text = "a,\"b,c\",\"say \"\"hi\"\"\"\n\"multi\nline\",x,y\nlast,1,2";
    let rows = ZiFTRows(text, ',');
    assert_eq!(rows.len(), 3);
    assert_eq!(ZiFTFields(&rows[0]), vec!["a", "b,c", "say \"hi\""]);
    assert_eq!(ZiFTFields(&rows[1]), vec!["multi\nline", "x", "y"]);
    assert_eq!(rows[1].as_ref().unwrap().line_number, 2);
    assert_eq!(rows[2].as_ref().unwrap().line_number, 4);
}

#[test]
fn ZiFTParserAcceptsAllLineEndings() {
    let rows = ZiFTRows("a;b\r\nc;d\re;f\n", ';');
    let lines: Vec<usize> = rows.iter().map(|r| r.as_ref().unwrap().line_number).collect();
    assert_eq!(lines, vec![1, 2, 3]);
    assert_eq!(ZiFTFields(&rows[2]), vec!["e", "f"]);
}

#[test]
fn ZiFTParserSkipsBlankLinesKeepingLineNumbers() {
    let rows = ZiFTRows("a\n\n\r\n\nb\n\n", ',');
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].as_ref().unwrap().line_number, 5);
}

#[test]
fn ZiFTParserKeepsQuotedEmptyAndWhitespaceRows() {
    let rows = ZiFTRows("name\nalice\n\"\"\n   \nbob\n\"\"", ',');
    assert_eq!(rows.len(), 6);
    assert_eq!(ZiFTFields(&rows[2]), vec![""]);
    assert_eq!(rows[2].as_ref().unwrap().line_number, 3);
    assert_eq!(ZiFTFields(&rows[3]), vec!["   "]);
    assert_eq!(ZiFTFields(&rows[4]), vec!["bob"]);
    assert_eq!(ZiFTFields(&rows[5]), vec![""]);
}

#[test]
fn ZiFTParserKeepsEmptyTrailingField() {
    let rows = ZiFTRows("a,\n,b\n", ',');
    assert_eq!(ZiFTFields(&rows[0]), vec!["a", ""]);
    assert_eq!(ZiFTFields(&rows[1]), vec!["", "b"]);
}

#[test]
fn ZiFTParserUnterminatedQuoteEndsStreamAtStartLine() {
    let mut text = String::from("id,name\n");
    for i in 1..=8 {
        text.push_str(&format!("{i},row{i}\n"));
    }
    text.push_str("9,\"never closed\n10,x\n11,y\n");

    let rows = ZiFTRows(&text, ',');
    assert_eq!(rows.len(), 10);
    assert!(rows[..9].iter().all(|r| r.is_ok()));
    match &rows[9] {
        Err(ZiError::MalformedRow { line_number, .. }) => assert_eq!(*line_number, 10),
        other => panic!("expected malformed row, got {other:?}"),
    }
}

#[test]
fn ZiFTParserStopsAfterError() {
    let mut parser = ZiFTParser("ok\n\"open", ',');
    assert!(parser.next().unwrap().is_ok());
    assert!(parser.next().unwrap().is_err());
    assert!(parser.next().is_none());
    assert_eq!(parser.ZiFRowsParsed(), 1);
}

#[test]
fn ZiFTParserRejectsOversizedRecords() {
    let mut parser = ZiFTParser("short\nthis record is far too long\n", ',').ZiFWithMaxRecordBytes(10);
    assert_eq!(ZiFTFields(&parser.next().unwrap()), vec!["short"]);
    match parser.next() {
        Some(Err(ZiError::MalformedRow { line_number, reason })) => {
            assert_eq!(line_number, 2);
            assert!(reason.contains("10 bytes"));
        }
        other => panic!("expected oversize error, got {other:?}"),
    }
}
