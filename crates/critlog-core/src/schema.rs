//! Wire schema of the critical event log written by `system_server`.
//!
//! Laid out the way `prost-build` would generate it from
//! `critical_event_log.proto`, with the messages declared by hand so no
//! build script or `protoc` is needed.

/// Root message of the on-device storage file
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CriticalEventLogStorageProto {
    /// Events in the order they were logged
    #[prost(message, repeated, tag = "1")]
    pub events: ::prost::alloc::vec::Vec<CriticalEventProto>,
}

/// A single logged event
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CriticalEventProto {
    /// Milliseconds since the Unix epoch
    #[prost(int64, optional, tag = "1")]
    pub timestamp_ms: ::core::option::Option<i64>,
    /// The event payload
    #[prost(oneof = "critical_event_proto::Event", tags = "2, 3, 4, 5, 6, 7, 8, 9")]
    pub event: ::core::option::Option<critical_event_proto::Event>,
}

/// Nested message and enum types in `CriticalEventProto`.
pub mod critical_event_proto {
    /// System server watchdog fired
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Watchdog {
        /// Watchdog subject line
        #[prost(string, optional, tag = "1")]
        pub subject: ::core::option::Option<::prost::alloc::string::String>,
        /// Identifier shared with the matching dropbox entry
        #[prost(string, optional, tag = "2")]
        pub uuid: ::core::option::Option<::prost::alloc::string::String>,
    }

    /// Watchdog reached its half-way point
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HalfWatchdog {
        /// Watchdog subject line
        #[prost(string, optional, tag = "1")]
        pub subject: ::core::option::Option<::prost::alloc::string::String>,
    }

    /// Application not responding
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AppNotResponding {
        /// ANR subject line
        #[prost(string, optional, tag = "1")]
        pub subject: ::core::option::Option<::prost::alloc::string::String>,
        /// Process name
        #[prost(string, optional, tag = "2")]
        pub process: ::core::option::Option<::prost::alloc::string::String>,
        /// Process id
        #[prost(int32, optional, tag = "3")]
        pub pid: ::core::option::Option<i32>,
        /// Linux uid of the process
        #[prost(int32, optional, tag = "4")]
        pub uid: ::core::option::Option<i32>,
        /// Process category
        #[prost(enumeration = "ProcessClass", optional, tag = "5")]
        pub process_class: ::core::option::Option<i32>,
    }

    /// Uncaught Java exception
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct JavaCrash {
        /// Fully qualified exception class
        #[prost(string, optional, tag = "1")]
        pub exception_class: ::core::option::Option<::prost::alloc::string::String>,
        /// Process name
        #[prost(string, optional, tag = "2")]
        pub process: ::core::option::Option<::prost::alloc::string::String>,
        /// Process id
        #[prost(int32, optional, tag = "3")]
        pub pid: ::core::option::Option<i32>,
        /// Linux uid of the process
        #[prost(int32, optional, tag = "4")]
        pub uid: ::core::option::Option<i32>,
        /// Process category
        #[prost(enumeration = "ProcessClass", optional, tag = "5")]
        pub process_class: ::core::option::Option<i32>,
    }

    /// Native crash (tombstone)
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct NativeCrash {
        /// Process name
        #[prost(string, optional, tag = "1")]
        pub process: ::core::option::Option<::prost::alloc::string::String>,
        /// Process id
        #[prost(int32, optional, tag = "2")]
        pub pid: ::core::option::Option<i32>,
        /// Linux uid of the process
        #[prost(int32, optional, tag = "3")]
        pub uid: ::core::option::Option<i32>,
        /// Process category
        #[prost(enumeration = "ProcessClass", optional, tag = "4")]
        pub process_class: ::core::option::Option<i32>,
    }

    /// System server finished booting
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SystemServerStarted {}

    /// Package installation session
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct InstallPackages {}

    /// Binder call volume exceeded the configured threshold
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ExcessiveBinderCalls {
        /// Uid of the calling process
        #[prost(int32, optional, tag = "1")]
        pub uid: ::core::option::Option<i32>,
    }

    /// Category of the process an event belongs to
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ProcessClass {
        /// Not classified
        Unknown = 0,
        /// Regular installed app
        DataApp = 1,
        /// App on the system image
        SystemApp = 2,
        /// The system server itself
        SystemServer = 3,
    }

    impl ProcessClass {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                ProcessClass::Unknown => "PROCESS_CLASS_UNKNOWN",
                ProcessClass::DataApp => "DATA_APP",
                ProcessClass::SystemApp => "SYSTEM_APP",
                ProcessClass::SystemServer => "SYSTEM_SERVER",
            }
        }
    }

    /// The event payload; exactly one is set by the writer
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Event {
        /// Watchdog
        #[prost(message, tag = "2")]
        Watchdog(Watchdog),
        /// Half watchdog
        #[prost(message, tag = "3")]
        HalfWatchdog(HalfWatchdog),
        /// ANR
        #[prost(message, tag = "4")]
        Anr(AppNotResponding),
        /// Java crash
        #[prost(message, tag = "5")]
        JavaCrash(JavaCrash),
        /// System server started
        #[prost(message, tag = "6")]
        SystemServerStarted(SystemServerStarted),
        /// Native crash
        #[prost(message, tag = "7")]
        NativeCrash(NativeCrash),
        /// Package install
        #[prost(message, tag = "8")]
        InstallPackages(InstallPackages),
        /// Excessive binder calls
        #[prost(message, tag = "9")]
        ExcessiveBinderCalls(ExcessiveBinderCalls),
    }
}

/// Field number of `CriticalEventLogStorageProto.events`
pub const STORAGE_EVENTS_FIELD: u32 = 1;

/// Field number of `CriticalEventProto.timestamp_ms`
pub const EVENT_TIMESTAMP_FIELD: u32 = 1;
