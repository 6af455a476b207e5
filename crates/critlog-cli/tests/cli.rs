use assert_cmd::Command;
use critlog_core::schema::critical_event_proto as pb;
use critlog_core::schema::{CriticalEventLogStorageProto, CriticalEventProto};
use predicates::prelude::*;
use prost::Message;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn critlog() -> Command {
    let mut cmd = Command::cargo_bin("critlog").unwrap();
    cmd.env("TZ", "UTC").env_remove("RUST_LOG");
    cmd
}

fn three_events() -> CriticalEventLogStorageProto {
    CriticalEventLogStorageProto {
        events: vec![
            CriticalEventProto {
                timestamp_ms: Some(1_700_000_000_000),
                event: Some(pb::Event::Anr(pb::AppNotResponding {
                    subject: Some("Input dispatching timed out".into()),
                    process: Some("com.example.app".into()),
                    pid: Some(4242),
                    uid: Some(10123),
                    process_class: Some(pb::ProcessClass::DataApp as i32),
                })),
            },
            CriticalEventProto {
                timestamp_ms: Some(1_700_000_060_000),
                event: Some(pb::Event::JavaCrash(pb::JavaCrash {
                    exception_class: Some("java.lang.NullPointerException".into()),
                    process: Some("com.example.app".into()),
                    pid: Some(4242),
                    uid: Some(10123),
                    process_class: Some(pb::ProcessClass::DataApp as i32),
                })),
            },
            CriticalEventProto {
                timestamp_ms: Some(1_700_000_120_000),
                event: Some(pb::Event::Watchdog(pb::Watchdog {
                    subject: Some("Blocked in handler on main thread".into()),
                    uuid: None,
                })),
            },
        ],
    }
}

fn write_fixture(dir: &TempDir, storage: &CriticalEventLogStorageProto) -> PathBuf {
    let path = dir.path().join("critical_event_log.pb");
    fs::write(&path, storage.encode_to_vec()).unwrap();
    path
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in output:\n{}", needle, haystack))
}

#[test]
fn test_cli_version() {
    critlog()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("critlog"));
}

#[test]
fn test_cli_help_lists_event_types() {
    critlog()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--event-types"))
        .stdout(predicate::str::contains("excessive_binder_calls"));
}

#[test]
fn test_all_events_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    let output = critlog().arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.starts_with("=================================================="));
    assert!(stdout.contains("Events Count: 3\n"));
    let anr = position(&stdout, "Event #1:\n  Time: 2023-11-14 22:13:20.000 (1700000000000 ms)\n  Type: App Not Responding (ANR)");
    let crash = position(&stdout, "Event #2:\n  Time: 2023-11-14 22:14:20.000 (1700000060000 ms)\n  Type: Java Crash");
    let watchdog = position(&stdout, "Event #3:\n  Time: 2023-11-14 22:15:20.000 (1700000120000 ms)\n  Type: Watchdog");
    assert!(anr < crash && crash < watchdog);
    assert!(stdout.contains("    Process: com.example.app (PID: 4242, UID: 10123)\n    Process Class: DATA_APP\n"));
    assert!(stdout.contains("    UUID: unknown\n"));
}

#[test]
fn test_filter_single_type() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "anr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Events Count: 1\n"))
        .stdout(predicate::str::contains("Event #1:\n"))
        .stdout(predicate::str::contains("App Not Responding (ANR)"))
        .stdout(predicate::str::contains("Event #2").not())
        .stdout(predicate::str::contains("Java Crash").not());
}

#[test]
fn test_filter_renumbers_from_one() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "watchdog,java_crash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Events Count: 2\n"))
        .stdout(predicate::str::contains("Event #1:\n  Time: 2023-11-14 22:14:20.000"))
        .stdout(predicate::str::contains("Event #2:\n  Time: 2023-11-14 22:15:20.000"))
        .stdout(predicate::str::contains("Displayed 2 of 3 events"));
}

#[test]
fn test_invalid_event_type() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "bogus_type"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("bogus_type"));
}

#[test]
fn test_invalid_event_type_checked_before_reading() {
    // The path does not exist; the filter error must win.
    critlog()
        .args(["/nonexistent/critical_event_log.pb", "--event-types", "anr,crash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("crash"))
        .stderr(predicate::str::contains("not found").not());
}

#[test]
fn test_empty_storage() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &CriticalEventLogStorageProto::default());

    critlog()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("CRITICAL EVENT STORAGE"))
        .stdout(predicate::str::contains("Events Count: 0\n"))
        .stdout(predicate::str::contains("No events found in storage.\n"))
        .stdout(predicate::str::contains("Event #").not());
}

#[test]
fn test_filter_matching_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "native_crash"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("CRITICAL EVENT STORAGE"))
        .stdout(predicate::str::contains("Events Count: 0\n"))
        .stdout(predicate::str::contains("No events of type(s) native_crash found.\n"))
        .stdout(predicate::str::contains("Event #").not())
        .stdout(predicate::str::contains("Displayed 0 of 3 events"));
}

#[test]
fn test_debug_as_event_type_value() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "debug"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid event type(s): debug"));
}

#[test]
fn test_serial_with_path_rejected() {
    critlog()
        .args(["/nonexistent/critical_event_log.pb", "--serial", "emulator-5554"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"))
        .stderr(predicate::str::contains("not found").not());
}

#[test]
fn test_top_level_group_accepted() {
    // A group holding a nested field 1, then one event record with only a
    // timestamp
    let data = [0x2B, 0x0A, 0x00, 0x2C, 0x0A, 0x02, 0x08, 0x07];
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grouped.pb");
    fs::write(&path, data).unwrap();

    critlog()
        .arg(&path)
        .arg("--debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("Top-level fields: 2"))
        .stdout(predicate::str::contains("Events Count: 1\n"))
        .stdout(predicate::str::contains("Type: Unknown\n    (no data)\n"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.pb");

    critlog()
        .arg(&path)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing.pb"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_malformed_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pb");
    let mut data = three_events().encode_to_vec();
    data.truncate(data.len() / 2);
    fs::write(&path, data).unwrap();

    critlog()
        .arg(&path)
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to decode"))
        .stderr(predicate::str::contains("broken.pb"));
}

#[test]
fn test_path_and_auto_conflict() {
    critlog()
        .args(["log.pb", "--auto"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_debug_flag() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .arg("--debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("BLAKE3: "))
        .stdout(predicate::str::contains("Events decoded: 3"))
        .stdout(predicate::str::contains("Top-level fields: 3"))
        .stdout(predicate::str::contains("Events Count: 3\n"));
}

#[test]
fn test_trailing_debug_token() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, &three_events());

    critlog()
        .arg(&path)
        .args(["--event-types", "anr", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEBUG\n"))
        .stdout(predicate::str::contains("Events Count: 1\n"));
}

#[test]
fn test_unknown_event_rendered() {
    // One event with only a timestamp and a field from a newer schema
    let record = [0x08, 0x07, 0x50, 0x63];
    let mut data = vec![0x0A, record.len() as u8];
    data.extend_from_slice(&record);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("newer.pb");
    fs::write(&path, data).unwrap();

    critlog()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Type: Unknown\n    #10 varint = 99\n"));
}

#[cfg(unix)]
mod device {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Puts an executable `adb` running `body` first on PATH
    fn fake_adb(dir: &Path, body: &str) -> String {
        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("adb");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let path = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", bin.display(), path)
    }

    const COPYING_ADB: &str = r#"if [ "$1" = "-s" ]; then echo "$2" > "$RECORD.serial"; shift 2; fi
[ "$1" = "pull" ] || exit 2
echo "$3" > "$RECORD"
cp "$FIXTURE" "$3""#;

    #[test]
    fn test_auto_pulls_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let fixture = write_fixture(&dir, &three_events());
        let record = dir.path().join("pulled-to");

        critlog()
            .arg("--auto")
            .args(["--event-types", "java_crash"])
            .env("PATH", fake_adb(dir.path(), COPYING_ADB))
            .env("FIXTURE", &fixture)
            .env("RECORD", &record)
            .assert()
            .success()
            .stdout(predicate::str::contains("Events Count: 1\n"))
            .stdout(predicate::str::contains("Exception: java.lang.NullPointerException"));

        let local = fs::read_to_string(&record).unwrap();
        assert!(!local.trim().is_empty());
        assert!(
            !Path::new(local.trim()).exists(),
            "temporary file {} was not removed",
            local.trim()
        );
    }

    #[test]
    fn test_auto_passes_serial() {
        let dir = TempDir::new().unwrap();
        let fixture = write_fixture(&dir, &three_events());
        let record = dir.path().join("pulled-to");

        critlog()
            .args(["--auto", "--serial", "emulator-5554"])
            .env("PATH", fake_adb(dir.path(), COPYING_ADB))
            .env("FIXTURE", &fixture)
            .env("RECORD", &record)
            .assert()
            .success()
            .stdout(predicate::str::contains("Events Count: 3\n"));

        let serial = fs::read_to_string(dir.path().join("pulled-to.serial")).unwrap();
        assert_eq!(serial.trim(), "emulator-5554");
    }

    #[test]
    fn test_auto_without_device() {
        let dir = TempDir::new().unwrap();
        let body = "echo 'adb: error: no devices/emulators found' >&2\nexit 1";

        critlog()
            .arg("--auto")
            .env("PATH", fake_adb(dir.path(), body))
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("no device available"));
    }

    #[test]
    fn test_auto_remote_file_missing() {
        let dir = TempDir::new().unwrap();
        let body = "echo \"adb: error: failed to stat remote object '$2': No such file or directory\" >&2\nexit 1";

        critlog()
            .arg("--auto")
            .env("PATH", fake_adb(dir.path(), body))
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "/data/misc/critical-events/critical_event_log.pb",
            ))
            .stderr(predicate::str::contains("not found on device"));
    }

    #[test]
    fn test_auto_removes_temp_file_on_decode_failure() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.pb");
        fs::write(&broken, [0x0A, 0x7F]).unwrap();
        let record = dir.path().join("pulled-to");

        critlog()
            .arg("--auto")
            .env("PATH", fake_adb(dir.path(), COPYING_ADB))
            .env("FIXTURE", &broken)
            .env("RECORD", &record)
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to decode"));

        let local = fs::read_to_string(&record).unwrap();
        assert!(!Path::new(local.trim()).exists());
    }
}
