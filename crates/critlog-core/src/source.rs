//! Where the log bytes come from.
//!
//! The decoder only ever sees bytes. A [`Source`] is either a local file or
//! the fixed log path on a device reached through `adb`, and both are used
//! the same way:
//!
//! ```no_run
//! use critlog_core::source::{LocalFile, Source};
//!
//! let source = LocalFile::new("critical_event_log.pb");
//! let bytes = source.fetch()?;
//! let storage = critlog_core::decode_storage(&bytes, &source.describe())?;
//! # Ok::<(), critlog_core::Error>(())
//! ```

use crate::error::{Error, Result};
use bytes::Bytes;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Location of the log on the device, as written by `system_server`
pub const DEVICE_LOG_PATH: &str = "/data/misc/critical-events/critical_event_log.pb";

/// A provider of log bytes
pub trait Source {
    /// Human readable name of the source, used in messages and errors
    fn describe(&self) -> String;

    /// Returns the full contents of the source
    fn fetch(&self) -> Result<Bytes>;
}

/// A log file on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    /// Creates a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path this source reads
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for LocalFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Bytes> {
        let data = fs::read(&self.path).map_err(|e| Error::file_read(&self.path, e))?;
        info!("Read {} bytes from {}", data.len(), self.path.display());
        Ok(Bytes::from(data))
    }
}

/// Configuration for pulling the log off a device
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device bridge executable, looked up on `PATH` (default: `adb`)
    pub program: OsString,
    /// Serial of the device to use when several are connected
    pub serial: Option<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            program: OsString::from("adb"),
            serial: None,
        }
    }
}

impl DeviceConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device bridge executable
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the device serial
    pub fn serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial;
        self
    }
}

/// The device log, copied over `adb pull` into a temporary file
#[derive(Debug, Clone, Default)]
pub struct DevicePull {
    config: DeviceConfig,
}

impl DevicePull {
    /// Creates a source using `config`
    pub fn new(config: DeviceConfig) -> Self {
        Self { config }
    }

    fn command(&self, local: &Path) -> Command {
        let mut cmd = Command::new(&self.config.program);
        if let Some(serial) = &self.config.serial {
            cmd.arg("-s").arg(serial);
        }
        cmd.arg("pull").arg(DEVICE_LOG_PATH).arg(local);
        cmd
    }
}

impl Source for DevicePull {
    fn describe(&self) -> String {
        match &self.config.serial {
            Some(serial) => format!("device {}:{}", serial, DEVICE_LOG_PATH),
            None => format!("device:{}", DEVICE_LOG_PATH),
        }
    }

    fn fetch(&self) -> Result<Bytes> {
        // Removed when dropped, whichever way this function returns.
        let local = tempfile::Builder::new()
            .prefix("critical_event_log")
            .suffix(".pb")
            .tempfile()
            .map_err(|e| Error::temp_file(std::env::temp_dir(), e))?;

        let mut cmd = self.command(local.path());
        info!("Executing: {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::device_unavailable(format!(
                    "'{}' not found on PATH",
                    self.config.program.to_string_lossy()
                ))
            } else {
                Error::device_unavailable(format!(
                    "failed to run '{}': {}",
                    self.config.program.to_string_lossy(),
                    e
                ))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("adb pull exited with {}", output.status);
            return Err(classify_pull_failure(&stderr));
        }

        let data = fs::read(local.path()).map_err(|e| Error::file_read(local.path(), e))?;
        info!(
            "Pulled {} ({} bytes) to {}",
            DEVICE_LOG_PATH,
            data.len(),
            local.path().display()
        );

        let path = local.path().to_path_buf();
        match local.close() {
            Ok(()) => debug!("Cleaned up temporary file: {}", path.display()),
            Err(e) => warn!("Failed to clean up temporary file {}: {}", path.display(), e),
        }

        Ok(Bytes::from(data))
    }
}

/// Maps the stderr of a failed `adb pull` to an error
pub fn classify_pull_failure(stderr: &str) -> Error {
    let message = stderr.trim();
    let lower = message.to_ascii_lowercase();

    const NO_DEVICE: [&str; 5] = [
        "no devices/emulators found",
        "device offline",
        "device unauthorized",
        "no device",
        "not found",
    ];
    const NO_FILE: [&str; 2] = ["does not exist", "no such file or directory"];

    // Missing files also say "not found" on some adb versions, so check
    // them first.
    if NO_FILE.iter().any(|p| lower.contains(p)) {
        return Error::remote_file_not_found(DEVICE_LOG_PATH);
    }
    if NO_DEVICE.iter().any(|p| lower.contains(p)) {
        return Error::device_unavailable(message);
    }
    Error::pull_failed(DEVICE_LOG_PATH, message)
}
