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

use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use zidrop::errors::ZiError;
use zidrop::ingest::format::{ZiCCompression, ZiCDecompressor};

fn ZiFTGzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("compress");
    encoder.finish().expect("finish gzip")
}

fn ZiFTWriteFile(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

fn ZiFTReadAll(path: &PathBuf) -> (ZiCCompression, Vec<u8>, Vec<String>) {
    let opened = ZiCDecompressor::ZiFNew().ZiFOpen(path).expect("open");
    let compression = opened.compression;
    let warnings = opened.warnings.clone();
    let mut source = opened.source;
    let mut out = Vec::new();
    source.read_to_end(&mut out).expect("read");
    (compression, out, warnings)
}

#[test]
fn ZiFTDecompressPlainFilePassesThrough() {
    let dir = TempDir::new().expect("tmp");
    let path = ZiFTWriteFile(&dir, "plain.csv", b"a,b\n1,2\n");
    let (compression, bytes, warnings) = ZiFTReadAll(&path);
    assert_eq!(compression, ZiCCompression::None);
    assert_eq!(bytes, b"a,b\n1,2\n");
    assert!(warnings.is_empty());
}

#[test]
fn ZiFTDecompressGzipIsDetectedByContent() {
    let dir = TempDir::new().expect("tmp");
    // No .gz suffix: the magic bytes alone decide.
    let path = ZiFTWriteFile(&dir, "data.bin", &ZiFTGzip(b"x;y\n3;4\n"));
    let (compression, bytes, _) = ZiFTReadAll(&path);
    assert_eq!(compression, ZiCCompression::Gzip);
    assert_eq!(bytes, b"x;y\n3;4\n");
}

#[test]
fn ZiFTDecompressReadsEveryGzipMember() {
    let dir = TempDir::new().expect("tmp");
    let mut bytes = ZiFTGzip(b"a,b\n1,2\n");
    bytes.extend(ZiFTGzip(b"3,4\n"));
    let path = ZiFTWriteFile(&dir, "multi.csv.gz", &bytes);
    let (_, out, _) = ZiFTReadAll(&path);
    assert_eq!(out, b"a,b\n1,2\n3,4\n");
}

#[test]
fn ZiFTDecompressGzNameWithoutMagicWarns() {
    let dir = TempDir::new().expect("tmp");
    let path = ZiFTWriteFile(&dir, "mislabeled.csv.gz", b"a,b\n1,2\n");
    let (compression, bytes, warnings) = ZiFTReadAll(&path);
    assert_eq!(compression, ZiCCompression::None);
    assert_eq!(bytes, b"a,b\n1,2\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("no gzip header"));
}

#[test]
fn ZiFTDecompressTruncatedArchiveIsCorrupt() {
    let dir = TempDir::new().expect("tmp");
    let payload: String = (0..5000).map(|i| format!("{i},row-{}\n", i * 7)).collect();
    let gz = ZiFTGzip(payload.as_bytes());
    let path = ZiFTWriteFile(&dir, "broken.csv.gz", &gz[..gz.len() / 2]);

    match ZiCDecompressor::ZiFNew().ZiFOpen(&path) {
        Err(ZiError::CorruptArchive { path: p, .. }) => assert!(p.ends_with("broken.csv.gz")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("truncated archive accepted"),
    }
}

#[test]
fn ZiFTDecompressMissingFileIsIoWithPath() {
    let dir = TempDir::new().expect("tmp");
    let missing = dir.path().join("nope.csv");
    match ZiCDecompressor::ZiFNew().ZiFOpen(&missing) {
        Err(ZiError::Io { path, .. }) => assert!(path.ends_with("nope.csv")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing file opened"),
    }
}

#[test]
fn ZiFTDecompressWrapsInMemoryReaders() {
    let opened = ZiCDecompressor::ZiFNew()
        .ZiFWrap(Cursor::new(ZiFTGzip(b"k\tv\n")))
        .expect("wrap");
    assert_eq!(opened.compression, ZiCCompression::Gzip);
    assert_eq!(opened.total_bytes, None);
    let mut out = String::new();
    let mut source = opened.source;
    source.read_to_string(&mut out).expect("read");
    assert_eq!(out, "k\tv\n");
}
