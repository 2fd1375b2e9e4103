// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.
//!
//! Logs go to stderr so command output on stdout stays pipeable.

use rk_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{BinError, BinResult};

/// Crates whose chatter is capped regardless of the chosen level.
const QUIET_CRATES: &[&str] = &["hyper=warn", "reqwest=warn", "rustls=warn", "tokio=info"];

// =============================================================================
// Logging Initialization
// =============================================================================

/// Initializes the logging subsystem.
///
/// `RUST_LOG` wins over the configured level when set. Extra directives
/// from `logging.filter` are appended after the level.
pub fn init_logging(config: &LoggingConfig) -> BinResult<()> {
    let filter = build_filter(config)?;

    match config.format {
        LogFormat::Text => init_text_logging(filter),
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Compact => init_compact_logging(filter),
    }
}

/// Builds the filter for `config`.
pub fn build_filter(config: &LoggingConfig) -> BinResult<EnvFilter> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    for directive in QUIET_CRATES {
        filter = filter.add_directive(parse_directive(directive)?);
    }
    if let Some(extra) = &config.filter {
        for directive in extra.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            filter = filter.add_directive(parse_directive(directive)?);
        }
    }
    Ok(filter)
}

fn parse_directive(directive: &str) -> BinResult<Directive> {
    directive
        .parse()
        .map_err(|e| BinError::config(format!("Invalid log directive '{}': {}", directive, e)))
}

fn init_text_logging(filter: EnvFilter) -> BinResult<()> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stderr());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(is_terminal),
        )
        .try_init()
        .map_err(|e| BinError::init(e.to_string()))
}

fn init_json_logging(filter: EnvFilter) -> BinResult<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true),
        )
        .try_init()
        .map_err(|e| BinError::init(e.to_string()))
}

fn init_compact_logging(filter: EnvFilter) -> BinResult<()> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stderr());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(is_terminal),
        )
        .try_init()
        .map_err(|e| BinError::init(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
