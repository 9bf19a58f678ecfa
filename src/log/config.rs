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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::ZiCLogLevel;
use crate::errors::{Result, ZiError};

/// Configuration for the ZiCLogger: console/file enablement, threshold level,
/// JSON or text lines and size-based rotation of the log file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZiCLogConfig {
    pub default_level: String,
    pub console_enabled: bool,
    pub json_format_console: bool,
    /// Whether file logging is enabled.
    pub file_enabled: bool,
    /// Optional log file path when file logging is enabled.
    pub file_path: Option<String>,
    /// Emit JSON lines to the file instead of text.
    pub json_format_file: bool,
    /// Maximum file size in bytes before the file is rotated.
    pub max_bytes: Option<u64>,
    /// Number of backup files to keep when rotating.
    pub backup_count: u32,
}

impl Default for ZiCLogConfig {
    fn default() -> Self {
        ZiCLogConfig {
            default_level: "INFO".to_string(),
            console_enabled: true,
            json_format_console: false,
            file_enabled: false,
            file_path: None,
            json_format_file: true,
            max_bytes: Some(10 * 1024 * 1024),
            backup_count: 7,
        }
    }
}

impl ZiCLogConfig {
    /// Threshold level; unknown names fall back to INFO.
    #[allow(non_snake_case)]
    pub fn ZiFThreshold(&self) -> ZiCLogLevel {
        ZiCLogLevel::ZiFParse(&self.default_level).unwrap_or(ZiCLogLevel::Info)
    }

    #[allow(non_snake_case)]
    pub fn ZiFShouldLog(&self, level: ZiCLogLevel) -> bool {
        level >= self.ZiFThreshold()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZiCLogConfigBuilder {
    pub default_level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format_console: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_path: Option<String>,
    pub json_format_file: Option<bool>,
    pub max_bytes: Option<u64>,
    pub backup_count: Option<u32>,
}

impl ZiCLogConfigBuilder {
    #[allow(non_snake_case)]
    pub fn ZiFBuild(self) -> ZiCLogConfig {
        let base = ZiCLogConfig::default();
        ZiCLogConfig {
            default_level: self.default_level.unwrap_or(base.default_level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format_console: self
                .json_format_console
                .unwrap_or(base.json_format_console),
            file_enabled: self.file_enabled.unwrap_or(base.file_enabled),
            file_path: self.file_path.or(base.file_path),
            json_format_file: self.json_format_file.unwrap_or(base.json_format_file),
            max_bytes: self.max_bytes.or(base.max_bytes),
            backup_count: self.backup_count.unwrap_or(base.backup_count),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> Result<ZiCLogConfig> {
        let builder: ZiCLogConfigBuilder = serde_json::from_value(value.clone())
            .map_err(|err| ZiError::config(format!("invalid log configuration: {err}")))?;
        let config = builder.ZiFBuild();
        if ZiCLogLevel::ZiFParse(&config.default_level).is_none() {
            return Err(ZiError::config(format!(
                "unknown log level '{}'",
                config.default_level
            )));
        }
        if config.file_enabled && config.file_path.is_none() {
            return Err(ZiError::config("file logging enabled without file_path"));
        }
        Ok(config)
    }
}
