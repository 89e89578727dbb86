//! `LocalFiles` adapter tests against a real temporary directory.

#![allow(clippy::expect_used)]

use rampart_cli::application::ports::HostFiles;
use rampart_cli::infra::files::LocalFiles;

#[test]
fn write_then_read_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fragment.conf");

    LocalFiles
        .write(&path, "PasswordAuthentication no\n")
        .expect("write succeeds");

    assert!(LocalFiles.exists(&path));
    assert_eq!(
        LocalFiles.read_to_string(&path).expect("read succeeds"),
        "PasswordAuthentication no\n"
    );
}

#[test]
fn write_overwrites_existing_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fragment.conf");

    LocalFiles.write(&path, "old content\n").expect("first write");
    LocalFiles.write(&path, "new content\n").expect("second write");

    assert_eq!(
        LocalFiles.read_to_string(&path).expect("read succeeds"),
        "new content\n"
    );
}

#[test]
fn append_preserves_existing_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("jail.local");

    LocalFiles.write(&path, "[sshd]\nenabled = true\n").expect("write");
    LocalFiles
        .append(&path, "\n[DEFAULT]\nbackend = systemd\n")
        .expect("append");

    assert_eq!(
        LocalFiles.read_to_string(&path).expect("read succeeds"),
        "[sshd]\nenabled = true\n\n[DEFAULT]\nbackend = systemd\n"
    );
}

#[test]
fn append_creates_a_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("jail.local");
    assert!(!LocalFiles.exists(&path));

    LocalFiles.append(&path, "backend = systemd\n").expect("append");

    assert_eq!(
        LocalFiles.read_to_string(&path).expect("read succeeds"),
        "backend = systemd\n"
    );
}

#[test]
fn reading_a_missing_file_errors_with_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.conf");

    let err = LocalFiles
        .read_to_string(&path)
        .expect_err("missing file must error");

    assert!(err.to_string().contains("absent.conf"));
}
