//! Structural statistics about a decoded log, shown in debug mode.

use crate::error::Result;
use crate::model::{EventKind, LogStorage};
use crate::wire;
use std::collections::BTreeMap;
use std::fmt;

/// Raw and per-kind statistics of one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSummary {
    /// Size of the input in bytes
    pub byte_len: usize,
    /// Number of fields at the top level of the input
    pub top_level_fields: usize,
    /// Number of decoded events
    pub event_count: usize,
    /// Events per kind, every kind present (possibly zero)
    pub kind_counts: BTreeMap<EventKind, usize>,
    /// Events with no known payload
    pub unknown_count: usize,
    /// Smallest and largest recorded timestamp
    pub timestamp_range: Option<(i64, i64)>,
}

impl DebugSummary {
    /// Gathers statistics over the raw input and its decoded form
    pub fn collect(data: &[u8], storage: &LogStorage) -> Result<Self> {
        let top_level_fields = wire::parse_fields(data)?.len();

        let mut kind_counts: BTreeMap<EventKind, usize> =
            EventKind::ALL.iter().map(|&k| (k, 0)).collect();
        let mut unknown_count = 0;
        let mut timestamp_range: Option<(i64, i64)> = None;

        for event in &storage.events {
            match event.kind() {
                Some(kind) => *kind_counts.entry(kind).or_default() += 1,
                None => unknown_count += 1,
            }
            if let Some(ts) = event.timestamp_ms {
                timestamp_range = Some(match timestamp_range {
                    Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
                    None => (ts, ts),
                });
            }
        }

        Ok(Self {
            byte_len: data.len(),
            top_level_fields,
            event_count: storage.len(),
            kind_counts,
            unknown_count,
            timestamp_range,
        })
    }
}

impl fmt::Display for DebugSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DEBUG")?;
        writeln!(f, "  Raw size: {} bytes", self.byte_len)?;
        writeln!(f, "  Top-level fields: {}", self.top_level_fields)?;
        writeln!(f, "  Events decoded: {}", self.event_count)?;
        if let Some((first, last)) = self.timestamp_range {
            writeln!(f, "  Timestamp range: {} .. {} ms", first, last)?;
        }
        writeln!(f, "  Events by type:")?;
        for (kind, count) in &self.kind_counts {
            writeln!(f, "    {:<24}{}", kind.as_str(), count)?;
        }
        writeln!(f, "    {:<24}{}", "unknown", self.unknown_count)
    }
}
