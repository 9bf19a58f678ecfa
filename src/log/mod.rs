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

//! # Structured Logging
//!
//! Pipeline code logs through the `log` facade. Hosts that do not bring their
//! own backend can install [`ZiCLogger`] which writes JSON or text lines to
//! stdout and/or a size-rotated file.
//!
//! ```rust
//! use zidrop::log::{ZiCLogConfig, ZiCLogger};
//!
//! ZiCLogger::ZiFInit(ZiCLogConfig {
//!     default_level: "DEBUG".into(),
//!     ..Default::default()
//! });
//! log::info!("ready");
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use config::{ZiCLogConfig, ZiCLogConfigBuilder};
pub use self::core::{ZiCLogLevel, ZiCLogRecord, ZiCLogger};
pub use formatters::{ZiCJsonFormatter, ZiCTextFormatter};
pub use handlers::{ZiCFileHandler, ZiCLogHandler, ZiCStdoutHandler};
