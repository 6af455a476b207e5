//! Per-event text blocks.

use crate::model::{Event, Payload, ProcessInfo};
use chrono::{Local, TimeZone};
use std::fmt::{self, Display};

/// Rendered in place of any value that was not recorded
pub const PLACEHOLDER: &str = "unknown";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats single events as indented text blocks.
///
/// Timestamps are shown in `Tz`, the local zone unless a different one is
/// given (tests use `Utc`).
#[derive(Debug, Clone)]
pub struct EventFormatter<Tz: TimeZone = Local> {
    tz: Tz,
}

impl Default for EventFormatter<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFormatter<Local> {
    /// Creates a formatter using the local time zone
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl<Tz> EventFormatter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Creates a formatter showing times in `tz`
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    /// Formats `event` as the `index`-th (1-based) block of a report
    pub fn format(&self, index: usize, event: &Event) -> Vec<String> {
        let mut lines = vec![
            format!("Event #{}:", index),
            format!("  Time: {}", self.format_time(event.timestamp_ms)),
        ];
        let label = event.kind().map(|k| k.label()).unwrap_or("Unknown");
        lines.push(format!("  Type: {}", label));

        let mut body = Body(&mut lines);
        match &event.payload {
            Payload::Watchdog { subject, uuid } => {
                body.field("Subject", subject);
                body.field("UUID", uuid);
            }
            Payload::HalfWatchdog { subject } => body.field("Subject", subject),
            Payload::Anr { subject, process } => {
                body.field("Subject", subject);
                body.process(process);
            }
            Payload::JavaCrash {
                exception_class,
                process,
            } => {
                body.field("Exception", exception_class);
                body.process(process);
            }
            Payload::NativeCrash { process } => body.process(process),
            Payload::SystemServerStarted | Payload::InstallPackages => {}
            Payload::ExcessiveBinderCalls { uid } => body.field("UID", uid),
            Payload::Unknown { raw_fields } if raw_fields.is_empty() => body.line("(no data)"),
            Payload::Unknown { raw_fields } => {
                for field in raw_fields {
                    body.line(field);
                }
            }
        }

        lines
    }

    fn format_time(&self, timestamp_ms: Option<i64>) -> String {
        let Some(ms) = timestamp_ms else {
            return PLACEHOLDER.to_string();
        };
        match self.format_timestamp(ms) {
            Some(time) => format!("{} ({} ms)", time, ms),
            None => format!("Invalid timestamp ({} ms)", ms),
        }
    }

    /// Formats a millisecond timestamp, `None` if it is not positive or out
    /// of range
    pub fn format_timestamp(&self, ms: i64) -> Option<String> {
        if ms <= 0 {
            return None;
        }
        self.tz
            .timestamp_millis_opt(ms)
            .single()
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Collects the indented body lines of one block
struct Body<'a>(&'a mut Vec<String>);

impl Body<'_> {
    fn line(&mut self, content: impl Display) {
        self.0.push(format!("    {}", content));
    }

    fn field<T: Display>(&mut self, name: &str, value: &Option<T>) {
        self.line(format_args!("{}: {}", name, Shown(value)));
    }

    fn process(&mut self, process: &ProcessInfo) {
        self.line(format_args!(
            "Process: {} (PID: {}, UID: {})",
            Shown(&process.name),
            Shown(&process.pid),
            Shown(&process.uid)
        ));
        self.field("Process Class", &process.class);
    }
}

/// Displays the value or [`PLACEHOLDER`]
struct Shown<'a, T>(&'a Option<T>);

impl<T: Display> Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(PLACEHOLDER),
        }
    }
}
