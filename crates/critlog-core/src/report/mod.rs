//! Report rendering.
//!
//! A report is a fixed banner, the number of events that passed the filter,
//! one numbered block per such event, and a footer:
//!
//! ```text
//! ==================================================
//! CRITICAL EVENT STORAGE
//! ==================================================
//! Events Count: 1
//! --------------------------------------------------
//! Event #1:
//!   Time: 2023-11-14 22:13:20.123 (1700000000123 ms)
//!   Type: Java Crash
//!     Exception: java.lang.IllegalStateException
//!     Process: com.example.app (PID: 4242, UID: 10123)
//!     Process Class: DATA_APP
//! ==================================================
//! Displayed 1 of 3 events
//! ```
//!
//! Blocks are numbered over the filtered events, in storage order. When there
//! are none, a one-line notice takes their place.

mod format;
mod summary;

use crate::error::Result;
use crate::filter::EventFilter;
use crate::model::LogStorage;
use chrono::{Local, TimeZone};
use std::fmt::{Display, Write as FmtWrite};
use tracing::debug;

pub use format::{EventFormatter, PLACEHOLDER};
pub use summary::DebugSummary;

/// Title line of the banner
pub const BANNER_TITLE: &str = "CRITICAL EVENT STORAGE";

/// Configuration for report rendering
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Which events to show
    pub filter: EventFilter,
    /// Prepend a [`DebugSummary`]
    pub debug: bool,
    /// Width of the `=` and `-` rules (default: 50)
    pub rule_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            filter: EventFilter::all(),
            debug: false,
            rule_width: 50,
        }
    }
}

impl ReportConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the event filter
    pub fn filter(mut self, filter: EventFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets whether to prepend debug statistics
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the width of separator rules
    pub fn rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }
}

/// Renders a [`LogStorage`] as a text report
#[derive(Debug, Clone)]
pub struct ReportRenderer<Tz: TimeZone = Local> {
    config: ReportConfig,
    formatter: EventFormatter<Tz>,
}

impl ReportRenderer<Local> {
    /// Creates a renderer showing local times
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            formatter: EventFormatter::new(),
        }
    }
}

impl<Tz> ReportRenderer<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Creates a renderer showing times in `tz`
    pub fn with_timezone(config: ReportConfig, tz: Tz) -> Self {
        Self {
            config,
            formatter: EventFormatter::with_timezone(tz),
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Renders the report for `storage`
    pub fn render(&self, storage: &LogStorage) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_report(&mut out, storage);
        out
    }

    /// Renders the report, preceded by a [`DebugSummary`] of `data` when the
    /// config asks for it
    pub fn render_with_diagnostics(&self, data: &[u8], storage: &LogStorage) -> Result<String> {
        let report = self.render(storage);
        if !self.config.debug {
            return Ok(report);
        }
        let summary = DebugSummary::collect(data, storage)?;
        Ok(format!("{}{}", summary, report))
    }

    /// Writes the report for `storage` into `out`
    pub fn write_report<W: FmtWrite>(&self, out: &mut W, storage: &LogStorage) -> std::fmt::Result {
        let heavy = "=".repeat(self.config.rule_width);
        let light = "-".repeat(self.config.rule_width);

        let matching: Vec<_> = storage
            .events
            .iter()
            .filter(|e| self.config.filter.matches(e))
            .collect();

        debug!(
            "{} of {} event(s) match the filter",
            matching.len(),
            storage.len()
        );

        writeln!(out, "{}", heavy)?;
        writeln!(out, "{}", BANNER_TITLE)?;
        writeln!(out, "{}", heavy)?;
        writeln!(out, "Events Count: {}", matching.len())?;

        if storage.is_empty() {
            writeln!(out, "No events found in storage.")?;
        } else if matching.is_empty() {
            let names: Vec<_> = self.config.filter.kinds().map(|k| k.as_str()).collect();
            writeln!(out, "No events of type(s) {} found.", names.join(", "))?;
        }

        for (i, event) in matching.iter().enumerate() {
            writeln!(out, "{}", light)?;
            for line in self.formatter.format(i + 1, event) {
                writeln!(out, "{}", line)?;
            }
        }

        writeln!(out, "{}", heavy)?;
        writeln!(
            out,
            "Displayed {} of {} events",
            matching.len(),
            storage.len()
        )
    }
}
