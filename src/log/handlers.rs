//! Copyright © 2025 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::log::core::ZiCLogRecord;
use crate::log::formatters::{ZiCJsonFormatter, ZiCTextFormatter};

pub trait ZiCLogHandler {
    fn handle(&self, record: &ZiCLogRecord);
}

pub struct ZiCStdoutHandler {
    json: bool,
}

impl ZiCStdoutHandler {
    #[allow(non_snake_case)]
    pub fn ZiFNew(json: bool) -> Self {
        ZiCStdoutHandler { json }
    }
}

impl ZiCLogHandler for ZiCStdoutHandler {
    fn handle(&self, record: &ZiCLogRecord) {
        let line = if self.json {
            ZiCJsonFormatter::ZiFFormat(record)
        } else {
            ZiCTextFormatter::ZiFFormat(record)
        };
        println!("{}", line);
    }
}

pub struct ZiCFileHandler {
    path: PathBuf,
    json: bool,
    max_bytes: Option<u64>,
    backup_count: u32,
    file: Mutex<()>,
}

impl ZiCFileHandler {
    #[allow(non_snake_case)]
    pub fn ZiFNew(
        path: impl Into<PathBuf>,
        json: bool,
        max_bytes: Option<u64>,
        backup_count: u32,
    ) -> Self {
        ZiCFileHandler {
            path: path.into(),
            json,
            max_bytes,
            backup_count,
            file: Mutex::new(()),
        }
    }

    fn backup_path(path: &Path, idx: u32) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{idx}"));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        let Some(max_bytes) = self.max_bytes else {
            return;
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > max_bytes => {}
            _ => return,
        }
        if self.backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }

        // path.N-1 -> path.N, ..., path -> path.1
        for idx in (1..=self.backup_count).rev() {
            let from = if idx == 1 {
                self.path.clone()
            } else {
                Self::backup_path(&self.path, idx - 1)
            };
            if from.exists() {
                let _ = fs::rename(&from, Self::backup_path(&self.path, idx));
            }
        }
    }
}

impl ZiCLogHandler for ZiCFileHandler {
    fn handle(&self, record: &ZiCLogRecord) {
        let _guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.rotate_if_needed();

        let line = if self.json {
            ZiCJsonFormatter::ZiFFormat(record)
        } else {
            ZiCTextFormatter::ZiFFormat(record)
        };
        if let Ok(mut f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(f, "{}", line);
        }
    }
}
