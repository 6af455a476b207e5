//! Decoding of a serialized `CriticalEventLogStorageProto`.
//!
//! Decoding is all-or-nothing: a single malformed record fails the whole
//! file and no partial [`LogStorage`] is returned.

use crate::error::{Error, Result};
use crate::model::{Event, LogStorage};
use crate::schema::{CriticalEventLogStorageProto, EVENT_TIMESTAMP_FIELD, STORAGE_EVENTS_FIELD};
use crate::wire;
use prost::Message;
use tracing::{debug, trace};

/// Decodes `data` into a [`LogStorage`].
///
/// `source_description` names where the bytes came from and is carried in the
/// error on failure.
pub fn decode_storage(data: &[u8], source_description: &str) -> Result<LogStorage> {
    let proto = CriticalEventLogStorageProto::decode(data)
        .map_err(|e| Error::decode(source_description, e))?;

    debug!(
        "Decoded {} event(s) from {} bytes of {}",
        proto.events.len(),
        data.len(),
        source_description
    );

    // Records without a known payload keep their raw fields, which prost
    // discards, so those need a second look at the bytes.
    let records = if proto.events.iter().any(|e| e.event.is_none()) {
        let records = wire::length_delimited(data, STORAGE_EVENTS_FIELD)?;
        if records.len() != proto.events.len() {
            return Err(Error::internal(format!(
                "wire scan found {} event records, decoder found {}",
                records.len(),
                proto.events.len()
            )));
        }
        Some(records)
    } else {
        None
    };

    let mut events = Vec::with_capacity(proto.events.len());
    for (i, record) in proto.events.into_iter().enumerate() {
        let raw_fields = match (&record.event, &records) {
            (None, Some(records)) => {
                trace!("Event {} has no known payload, keeping raw fields", i + 1);
                wire::parse_fields(records[i])?
                    .into_iter()
                    .filter(|f| f.number != EVENT_TIMESTAMP_FIELD)
                    .collect()
            }
            _ => Vec::new(),
        };
        events.push(Event::from_proto(record, raw_fields));
    }

    Ok(LogStorage { events })
}
