// bitcoind-rpc/src/log/mod.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

use crate::error::{BitcoindError, Result as BitcoindResult};

pub const LOG_FILE_NAME: &str = "bitcoind-rpc.log";

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG`, when set, replaces the level directives from the config.
/// The returned guard must be kept alive for the file layer to flush.
pub fn init(
    config: &LogConfig,
    log_dir: &Path,
) -> BitcoindResult<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let mut file_guard = None;

    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::try_new(spec)
            .map_err(|e| BitcoindError::Config(format!("invalid RUST_LOG: {}", e)))?,
        _ => EnvFilter::try_new(config.filter_directives())
            .map_err(|e| BitcoindError::Config(format!("invalid log filter: {}", e)))?,
    };

    let mut layers = Vec::new();

    if config.file {
        fs::create_dir_all(log_dir)
            .map_err(|e| BitcoindError::io_with_path(log_dir.to_path_buf(), e))?;

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = if config.structured {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .boxed()
        };
        layers.push(file_layer);
        file_guard = Some(guard);
    }

    if config.stderr {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .boxed();
        layers.push(console_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| BitcoindError::Internal(format!("failed to init tracing: {}", e)))?;

    Ok(file_guard)
}

/// Helper: deserialize LevelFilter from string (e.g., "info", "debug")
fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<LevelFilter>().map_err(serde::de::Error::custom)
}

fn deserialize_module_levels<'de, D>(deserializer: D) -> Result<HashMap<String, LevelFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: HashMap<String, String> = Deserialize::deserialize(deserializer)?;
    map.into_iter()
        .map(|(target, level)| {
            level
                .parse::<LevelFilter>()
                .map(|level| (target, level))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

/// `[log]` section of the config file.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_level", deserialize_with = "deserialize_level_filter")]
    pub default_level: LevelFilter,

    #[serde(default = "default_structured")]
    pub structured: bool,

    #[serde(default = "default_stderr")]
    pub stderr: bool,

    #[serde(default = "default_file")]
    pub file: bool,

    /// Directory for the log file; `<base>/logs` when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default, deserialize_with = "deserialize_module_levels")]
    pub modules: HashMap<String, LevelFilter>,
}

fn default_log_level() -> LevelFilter { LevelFilter::WARN }
fn default_structured() -> bool { false }
fn default_stderr() -> bool { true }
fn default_file() -> bool { false }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: default_log_level(),
            structured: default_structured(),
            stderr: default_stderr(),
            file: default_file(),
            dir: None,
            modules: HashMap::new(),
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directives: the crate default first, then per-target overrides.
    pub fn filter_directives(&self) -> String {
        let level = |l: &LevelFilter| l.to_string().to_lowercase();
        let mut directives = vec![
            level(&self.default_level),
            format!("bitcoind_rpc={}", level(&self.default_level)),
        ];
        let mut modules: Vec<_> = self.modules.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));
        for (target, l) in modules {
            directives.push(format!("{}={}", target, level(l)));
        }
        directives.join(",")
    }
}
