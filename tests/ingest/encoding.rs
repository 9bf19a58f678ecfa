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

use encoding_rs::{UTF_8, WINDOWS_1251, WINDOWS_1252};
use zidrop::ingest::encoding::{ZiCEncodingDetector, ZiCTextDecoder, ZiFDecodeSample};

fn ZiFTDecodeAll(bytes: &[u8], encoding: &'static encoding_rs::Encoding) -> (String, usize) {
    let mut decoder = ZiCTextDecoder::ZiFNew(Cursor::new(bytes.to_vec()), encoding);
    let mut out = String::new();
    while let Some(c) = decoder.ZiFNextChar().expect("decode") {
        out.push(c);
    }
    (out, decoder.ZiFReplacements())
}

#[test]
fn ZiFTEncodingBomWinsWithFullConfidence() {
    let detector = ZiCEncodingDetector::default();

    let utf8 = detector.ZiFDetect(b"\xEF\xBB\xBFid,name\n");
    assert_eq!(utf8.encoding.name, "UTF-8");
    assert_eq!(utf8.encoding.confidence, 1.0);

    let utf16 = detector.ZiFDetect(b"\xFF\xFEi\0d\0\n\0");
    assert_eq!(utf16.encoding.name, "UTF-16LE");
    assert!(utf16.warning.is_none());
}

#[test]
fn ZiFTEncodingAsciiIsReportedAsUtf8() {
    let outcome = ZiCEncodingDetector::default().ZiFDetect(b"a,b\n1,2\n");
    assert_eq!(outcome.encoding.name, "UTF-8");
    assert_eq!(outcome.encoding.confidence, 1.0);
    assert!(outcome.warning.is_none());
}

#[test]
fn ZiFTEncodingUtf16WithoutBomFromNulLane() {
    let bytes: Vec<u8> = "a,b\n1,2\n".bytes().flat_map(|b| [b, 0]).collect();
    let outcome = ZiCEncodingDetector::default().ZiFDetect(&bytes);
    assert_eq!(outcome.encoding.name, "UTF-16LE");

    let (text, _) = ZiFTDecodeAll(&bytes, outcome.encoding.ZiFResolve());
    assert_eq!(text, "a,b\n1,2\n");
}

#[test]
fn ZiFTEncodingCyrillicIsWindows1251() {
    let (bytes, _, _) = WINDOWS_1251.encode("Имя;Город\nИван;Москва\n");
    let outcome = ZiCEncodingDetector::default().ZiFDetect(&bytes);
    assert_eq!(outcome.encoding.name, "windows-1251");
    assert!(outcome.encoding.confidence >= 0.7);

    let (text, replaced) = ZiFTDecodeAll(&bytes, WINDOWS_1251);
    assert_eq!(text, "Имя;Город\nИван;Москва\n");
    assert_eq!(replaced, 0);
}

#[test]
fn ZiFTEncodingSporadicAccentsAreWindows1252() {
    let (bytes, _, _) = WINDOWS_1252.encode("name;city\ncafé;Paris\n");
    let outcome = ZiCEncodingDetector::default().ZiFDetect(&bytes);
    assert_eq!(outcome.encoding.name, "windows-1252");
    assert!(outcome.warning.is_none());
    assert_eq!(ZiFDecodeSample(&bytes, WINDOWS_1252), "name;city\ncafé;Paris\n");
}

#[test]
fn ZiFTEncodingFinalHighByteOfCompleteInputIsNotUtf8() {
    let detector = ZiCEncodingDetector::default();
    let bytes = b"name,n\nbob,1\ncaf\xE9";

    let whole = detector.ZiFDetect(bytes);
    assert_eq!(whole.encoding.name, "windows-1252");
    assert!(whole.warning.is_none());

    let utf8 = "name\nJosé".as_bytes();
    let cut = detector.ZiFDetectSample(&utf8[..utf8.len() - 1], true);
    assert_eq!(cut.encoding.name, "UTF-8");
    assert_eq!(cut.encoding.confidence, 1.0);
}

#[test]
fn ZiFTEncodingLowConfidenceFallsBackToUtf8() {
    let outcome = ZiCEncodingDetector::ZiFNew(0.7).ZiFDetect(&[b'1', b',', 0x85, b'\n']);
    assert_eq!(outcome.encoding.name, "UTF-8");
    let warning = outcome.warning.expect("fallback warning");
    assert!(warning.contains("windows-1252"));
}

#[test]
fn ZiFTEncodingInvalidBytesAreReplaced() {
    let (text, replaced) = ZiFTDecodeAll(b"a\xFFb\n", UTF_8);
    assert_eq!(text, "a\u{FFFD}b\n");
    assert!(replaced > 0);
}

#[test]
fn ZiFTEncodingDecoderStripsBom() {
    let (text, _) = ZiFTDecodeAll(b"\xEF\xBB\xBFid\n", UTF_8);
    assert_eq!(text, "id\n");
}
