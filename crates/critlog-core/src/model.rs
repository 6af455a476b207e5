//! Domain model of a decoded critical event log.
//!
//! The wire types in [`crate::schema`] mirror the protobuf layout. The types
//! here are what the filter and the formatter work with: closed enums for the
//! event kind and process class, and an explicit [`Payload::Unknown`] for
//! records that carry no payload this tool understands.

use crate::error::Error;
use crate::schema::critical_event_proto as pb;
use crate::schema::CriticalEventProto;
use crate::wire::RawField;
use std::fmt;
use std::str::FromStr;

/// The kinds of event a critical event log can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// System server watchdog
    Watchdog,
    /// Watchdog half-way warning
    HalfWatchdog,
    /// Application not responding
    Anr,
    /// Uncaught Java exception
    JavaCrash,
    /// Native crash
    NativeCrash,
    /// System server boot
    SystemServerStarted,
    /// Package install
    InstallPackages,
    /// Binder call volume over threshold
    ExcessiveBinderCalls,
}

impl EventKind {
    /// Every kind, in the order they are listed to users
    pub const ALL: [EventKind; 8] = [
        EventKind::Watchdog,
        EventKind::HalfWatchdog,
        EventKind::Anr,
        EventKind::JavaCrash,
        EventKind::NativeCrash,
        EventKind::SystemServerStarted,
        EventKind::InstallPackages,
        EventKind::ExcessiveBinderCalls,
    ];

    /// Identifier accepted by `--event-types`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Watchdog => "watchdog",
            EventKind::HalfWatchdog => "half_watchdog",
            EventKind::Anr => "anr",
            EventKind::JavaCrash => "java_crash",
            EventKind::NativeCrash => "native_crash",
            EventKind::SystemServerStarted => "system_server_started",
            EventKind::InstallPackages => "install_packages",
            EventKind::ExcessiveBinderCalls => "excessive_binder_calls",
        }
    }

    /// Human readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Watchdog => "Watchdog",
            EventKind::HalfWatchdog => "Half Watchdog",
            EventKind::Anr => "App Not Responding (ANR)",
            EventKind::JavaCrash => "Java Crash",
            EventKind::NativeCrash => "Native Crash",
            EventKind::SystemServerStarted => "System Server Started",
            EventKind::InstallPackages => "Install Packages",
            EventKind::ExcessiveBinderCalls => "Excessive Binder Calls",
        }
    }

    /// Comma separated list of all identifiers
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(EventKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::invalid_event_types(vec![s.to_string()], Self::valid_names()))
    }
}

/// Category of the process an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessClass {
    /// Recorded as unclassified
    Unknown,
    /// Regular installed app
    DataApp,
    /// App on the system image
    SystemApp,
    /// The system server
    SystemServer,
    /// A value newer than this schema
    Unrecognized(i32),
}

impl ProcessClass {
    /// Maps a raw enum value, keeping values this schema does not know
    pub fn from_raw(value: i32) -> Self {
        match pb::ProcessClass::try_from(value) {
            Ok(pb::ProcessClass::Unknown) => ProcessClass::Unknown,
            Ok(pb::ProcessClass::DataApp) => ProcessClass::DataApp,
            Ok(pb::ProcessClass::SystemApp) => ProcessClass::SystemApp,
            Ok(pb::ProcessClass::SystemServer) => ProcessClass::SystemServer,
            Err(_) => ProcessClass::Unrecognized(value),
        }
    }
}

impl fmt::Display for ProcessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = match self {
            ProcessClass::Unknown => pb::ProcessClass::Unknown,
            ProcessClass::DataApp => pb::ProcessClass::DataApp,
            ProcessClass::SystemApp => pb::ProcessClass::SystemApp,
            ProcessClass::SystemServer => pb::ProcessClass::SystemServer,
            ProcessClass::Unrecognized(value) => return write!(f, "UNRECOGNIZED({})", value),
        };
        f.write_str(known.as_str_name())
    }
}

/// Process an event was attributed to; every part may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Process name
    pub name: Option<String>,
    /// Process id
    pub pid: Option<i32>,
    /// Linux uid
    pub uid: Option<i32>,
    /// Process category
    pub class: Option<ProcessClass>,
}

impl ProcessInfo {
    fn from_parts(
        name: Option<String>,
        pid: Option<i32>,
        uid: Option<i32>,
        class: Option<i32>,
    ) -> Self {
        Self {
            name,
            pid,
            uid,
            class: class.map(ProcessClass::from_raw),
        }
    }
}

/// Kind specific contents of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Watchdog
    Watchdog {
        /// Subject line
        subject: Option<String>,
        /// Dropbox correlation id
        uuid: Option<String>,
    },
    /// Half watchdog
    HalfWatchdog {
        /// Subject line
        subject: Option<String>,
    },
    /// ANR
    Anr {
        /// Subject line
        subject: Option<String>,
        /// Affected process
        process: ProcessInfo,
    },
    /// Java crash
    JavaCrash {
        /// Exception class
        exception_class: Option<String>,
        /// Crashed process
        process: ProcessInfo,
    },
    /// Native crash
    NativeCrash {
        /// Crashed process
        process: ProcessInfo,
    },
    /// System server started
    SystemServerStarted,
    /// Package install
    InstallPackages,
    /// Excessive binder calls
    ExcessiveBinderCalls {
        /// Calling uid
        uid: Option<i32>,
    },
    /// No payload set, or one this schema does not know
    Unknown {
        /// Every field of the record other than the timestamp
        raw_fields: Vec<RawField>,
    },
}

impl Payload {
    /// The kind of this payload, `None` for [`Payload::Unknown`]
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Payload::Watchdog { .. } => Some(EventKind::Watchdog),
            Payload::HalfWatchdog { .. } => Some(EventKind::HalfWatchdog),
            Payload::Anr { .. } => Some(EventKind::Anr),
            Payload::JavaCrash { .. } => Some(EventKind::JavaCrash),
            Payload::NativeCrash { .. } => Some(EventKind::NativeCrash),
            Payload::SystemServerStarted => Some(EventKind::SystemServerStarted),
            Payload::InstallPackages => Some(EventKind::InstallPackages),
            Payload::ExcessiveBinderCalls { .. } => Some(EventKind::ExcessiveBinderCalls),
            Payload::Unknown { .. } => None,
        }
    }
}

impl From<pb::Event> for Payload {
    fn from(event: pb::Event) -> Self {
        match event {
            pb::Event::Watchdog(w) => Payload::Watchdog {
                subject: w.subject,
                uuid: w.uuid,
            },
            pb::Event::HalfWatchdog(w) => Payload::HalfWatchdog { subject: w.subject },
            pb::Event::Anr(a) => Payload::Anr {
                subject: a.subject,
                process: ProcessInfo::from_parts(a.process, a.pid, a.uid, a.process_class),
            },
            pb::Event::JavaCrash(c) => Payload::JavaCrash {
                exception_class: c.exception_class,
                process: ProcessInfo::from_parts(c.process, c.pid, c.uid, c.process_class),
            },
            pb::Event::NativeCrash(c) => Payload::NativeCrash {
                process: ProcessInfo::from_parts(c.process, c.pid, c.uid, c.process_class),
            },
            pb::Event::SystemServerStarted(_) => Payload::SystemServerStarted,
            pb::Event::InstallPackages(_) => Payload::InstallPackages,
            pb::Event::ExcessiveBinderCalls(b) => Payload::ExcessiveBinderCalls { uid: b.uid },
        }
    }
}

/// A single logged event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Milliseconds since the Unix epoch, if recorded
    pub timestamp_ms: Option<i64>,
    /// What happened
    pub payload: Payload,
}

impl Event {
    /// Converts a decoded record; `raw_fields` is used only when no payload is set
    pub fn from_proto(proto: CriticalEventProto, raw_fields: Vec<RawField>) -> Self {
        let payload = match proto.event {
            Some(event) => Payload::from(event),
            None => Payload::Unknown { raw_fields },
        };
        Self {
            timestamp_ms: proto.timestamp_ms,
            payload,
        }
    }

    /// Shorthand for `self.payload.kind()`
    pub fn kind(&self) -> Option<EventKind> {
        self.payload.kind()
    }
}

/// All events of one log file, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStorage {
    /// Events, oldest first
    pub events: Vec<Event>,
}

impl LogStorage {
    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
