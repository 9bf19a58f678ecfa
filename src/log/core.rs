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

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};

use crate::log::config::ZiCLogConfig;
use crate::log::handlers::{ZiCFileHandler, ZiCLogHandler, ZiCStdoutHandler};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ZiCLogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl ZiCLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCLogLevel::Debug => "DEBUG",
            ZiCLogLevel::Info => "INFO",
            ZiCLogLevel::Warning => "WARNING",
            ZiCLogLevel::Error => "ERROR",
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFParse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "DEBUG" => Some(ZiCLogLevel::Debug),
            "INFO" => Some(ZiCLogLevel::Info),
            "WARN" | "WARNING" => Some(ZiCLogLevel::Warning),
            "ERROR" => Some(ZiCLogLevel::Error),
            _ => None,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToFilter(&self) -> log::LevelFilter {
        match self {
            ZiCLogLevel::Debug => log::LevelFilter::Trace,
            ZiCLogLevel::Info => log::LevelFilter::Info,
            ZiCLogLevel::Warning => log::LevelFilter::Warn,
            ZiCLogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for ZiCLogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => ZiCLogLevel::Error,
            log::Level::Warn => ZiCLogLevel::Warning,
            log::Level::Info => ZiCLogLevel::Info,
            log::Level::Debug | log::Level::Trace => ZiCLogLevel::Debug,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ZiCLogRecord {
    pub level: ZiCLogLevel,
    /// Module path or event name the record originates from.
    pub target: String,
    pub message: String,
    pub fields: Map<String, Value>,
    pub timestamp: SystemTime,
}

impl ZiCLogRecord {
    #[allow(non_snake_case)]
    pub fn ZiFNew(level: ZiCLogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        ZiCLogRecord {
            level,
            target: target.into(),
            message: message.into(),
            fields: Map::new(),
            timestamp: SystemTime::now(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFToJson(&self) -> Value {
        let ts = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("target".into(), json!(self.target));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp_ms".into(), json!(ts));
        data.insert("fields".into(), Value::Object(self.fields.clone()));

        Value::Object(data)
    }
}

struct ZiCLoggerInner {
    config: ZiCLogConfig,
    handlers: Vec<Box<dyn ZiCLogHandler + Send + Sync>>,
}

impl ZiCLoggerInner {
    fn emit(&self, record: &ZiCLogRecord) {
        if !self.config.ZiFShouldLog(record.level) {
            return;
        }
        for h in &self.handlers {
            h.handle(record);
        }
    }
}

impl log::Log for ZiCLoggerInner {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.config.ZiFShouldLog(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut entry = ZiCLogRecord::ZiFNew(
            record.level().into(),
            record.target(),
            record.args().to_string(),
        );
        if let Some(line) = record.line() {
            entry.fields.insert("line".into(), json!(line));
        }
        self.emit(&entry);
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<ZiCLoggerInner> = OnceLock::new();

#[derive(Debug, Default)]
pub struct ZiCLogger;

impl ZiCLogger {
    /// Initialize the global logger with a configuration and install it as
    /// the `log` facade backend. Safe to call multiple times; the first call
    /// wins. Returns whether this call installed the backend.
    #[allow(non_snake_case)]
    pub fn ZiFInit(config: ZiCLogConfig) -> bool {
        let mut installed_here = false;
        let inner = LOGGER.get_or_init(|| {
            installed_here = true;
            let mut handlers: Vec<Box<dyn ZiCLogHandler + Send + Sync>> = Vec::new();
            if config.console_enabled {
                handlers.push(Box::new(ZiCStdoutHandler::ZiFNew(
                    config.json_format_console,
                )));
            }
            if config.file_enabled {
                if let Some(path) = &config.file_path {
                    handlers.push(Box::new(ZiCFileHandler::ZiFNew(
                        path.clone(),
                        config.json_format_file,
                        config.max_bytes,
                        config.backup_count,
                    )));
                }
            }
            ZiCLoggerInner {
                config: config.clone(),
                handlers,
            }
        });

        if !installed_here {
            return false;
        }
        match log::set_logger(inner) {
            Ok(()) => {
                log::set_max_level(inner.config.ZiFThreshold().ZiFToFilter());
                true
            }
            // Another backend owns the facade; structured events still flow.
            Err(_) => false,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsInitialized() -> bool {
        LOGGER.get().is_some()
    }

    /// Emit a structured log event. A no-op until the logger is initialized.
    #[allow(non_snake_case)]
    pub fn ZiFEvent<L>(level: ZiCLogLevel, target: &str, message: &str, fields: L)
    where
        L: IntoIterator<Item = (String, Value)>,
    {
        if let Some(inner) = LOGGER.get() {
            let mut record = ZiCLogRecord::ZiFNew(level, target, message);
            for (k, v) in fields {
                record.fields.insert(k, v);
            }
            inner.emit(&record);
        }
    }
}
