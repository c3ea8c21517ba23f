use std::fs;

use blockhost_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("hosts"));

    let first = writer.write("old").unwrap();
    assert_eq!(first.file_name().unwrap(), "hosts");
    assert_eq!(fs::read_to_string(&first).unwrap(), "old");

    let second = writer.write("new").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "new");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn failing_fill_keeps_previous_content_and_leaves_no_temp() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "previous").unwrap();

    let writer = AtomicFileWriter::new(target.clone());
    let result = writer.write_with(|out| {
        out.write_all(b"half")?;
        Err(std::io::Error::other("source vanished"))
    });

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&target).unwrap(), "previous");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.join("hosts"));
    let result = writer.write("data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}

#[cfg(unix)]
#[test]
fn existing_permissions_survive_replacement() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("hosts");
    fs::write(&target, "old").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

    AtomicFileWriter::new(target.clone()).write("new").unwrap();

    let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
}

#[cfg(unix)]
#[test]
fn symlinked_target_is_written_through() {
    let temp = TempDir::new().unwrap();
    let real_dir = temp.path().join("real");
    fs::create_dir(&real_dir).unwrap();
    let real = real_dir.join("hosts.real");
    fs::write(&real, "old").unwrap();
    let link = temp.path().join("hosts");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let written = AtomicFileWriter::new(link.clone()).write("new").unwrap();

    assert_eq!(written, link);
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&real).unwrap(), "new");
    assert_eq!(fs::read_dir(&real_dir).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn dangling_symlink_creates_its_target() {
    let temp = TempDir::new().unwrap();
    let link = temp.path().join("hosts");
    std::os::unix::fs::symlink("hosts.real", &link).unwrap();

    AtomicFileWriter::new(link.clone()).write("fresh").unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(
        fs::read_to_string(temp.path().join("hosts.real")).unwrap(),
        "fresh"
    );
}
