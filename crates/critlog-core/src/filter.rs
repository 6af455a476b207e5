//! Event type filter.

use crate::error::{Error, Result};
use crate::model::{Event, EventKind};
use std::collections::BTreeSet;

/// Set of event kinds to show; the empty set shows everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    kinds: BTreeSet<EventKind>,
}

impl EventFilter {
    /// A filter that matches every event
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter for exactly the given kinds
    pub fn only(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Builds a filter from user supplied identifiers.
    ///
    /// Names are trimmed and empty names are skipped. Every unrecognised name
    /// is reported at once.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kinds = BTreeSet::new();
        let mut invalid = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match name.parse::<EventKind>() {
                Ok(kind) => {
                    kinds.insert(kind);
                }
                Err(_) => invalid.push(name.to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(Error::invalid_event_types(invalid, EventKind::valid_names()));
        }

        Ok(Self { kinds })
    }

    /// Returns true if no kinds were requested
    pub fn is_all(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The requested kinds, in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Returns true if `event` should be shown.
    ///
    /// Events without a known kind only pass the match-all filter.
    pub fn matches(&self, event: &Event) -> bool {
        if self.is_all() {
            return true;
        }
        event.kind().is_some_and(|kind| self.kinds.contains(&kind))
    }
}
