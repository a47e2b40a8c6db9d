use std::fs;
use tempfile::tempdir;
use crate::app_name::AppName;
use crate::icon_set::IconSet;
use crate::icon_store::{IconStore, StoreError};
use crate::tests::init;

fn icon_set(entries: &[(&str, &[u8])]) -> IconSet {
    let mut icons = IconSet::new();

    for (name, bytes) in entries {
        icons.insert(AppName::from(*name), bytes.to_vec());
    }

    icons
}

#[test]
fn test_save_writes_bytes_unmodified() {
    init();

    let dir = tempdir().unwrap();
    let store = IconStore::new(dir.path());
    let mail: Vec<u8> = (0..=255).collect();
    let icons = icon_set(&[("Mail", &mail[..]), ("Maps", &[0x89, b'P', b'N', b'G'])]);

    let written = store.save(&icons).unwrap();

    assert_eq!(written, vec![dir.path().join("Mail.png"), dir.path().join("Maps.png")]);
    assert_eq!(fs::read(dir.path().join("Mail.png")).unwrap(), mail);
    assert_eq!(fs::read(dir.path().join("Maps.png")).unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[test]
fn test_save_empty_set_creates_directory_only() {
    init();

    let root = tempdir().unwrap();
    let target = root.path().join("icons").join("session");
    let store = IconStore::new(&target);

    let written = store.save(&IconSet::new()).unwrap();

    assert!(written.is_empty());
    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
}

#[test]
fn test_save_keeps_traversal_names_inside_directory() {
    init();

    let root = tempdir().unwrap();
    let target = root.path().join("icons");
    let store = IconStore::new(&target);
    let icons = icon_set(&[("../escape", &[1, 2, 3])]);

    let written = store.save(&icons).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0].parent().unwrap(), target.as_path());
    assert!(!root.path().join("escape.png").exists());
    assert_eq!(fs::read(&written[0]).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_save_rejects_unusable_name_before_writing() {
    init();

    let dir = tempdir().unwrap();
    let store = IconStore::new(dir.path());
    let icons = icon_set(&[("Mail", &[1]), ("//", &[2])]);

    let result = store.save(&icons);

    assert_eq!(result, Err(StoreError::InvalidName("//".to_string())));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_save_into_file_path_fails() {
    init();

    let dir = tempdir().unwrap();
    let file = dir.path().join("not_a_dir");
    fs::write(&file, b"x").unwrap();

    let result = IconStore::new(&file).save(&icon_set(&[("Mail", &[1])]));

    assert!(matches!(result, Err(StoreError::Io { .. })));
}

#[test]
fn test_save_into_read_only_directory_is_permission_denied() {
    init();

    let dir = tempdir().unwrap();
    let mut permissions = fs::metadata(dir.path()).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(dir.path(), permissions.clone()).unwrap();

    let result = IconStore::new(dir.path()).save(&icon_set(&[("Mail", &[1])]));

    permissions.set_readonly(false);
    fs::set_permissions(dir.path(), permissions).unwrap();

    assert_eq!(result, Err(StoreError::PermissionDenied(dir.path().to_path_buf())));
    assert!(!dir.path().join("Mail.png").exists());
}

#[test]
fn test_save_gives_colliding_stems_distinct_files() {
    init();

    let dir = tempdir().unwrap();
    let store = IconStore::new(dir.path());
    let icons = icon_set(&[("a:b", &[1, 1]), ("a?b", &[2, 2]), ("A|B", &[3, 3])]);

    let written = store.save(&icons).unwrap();

    assert_eq!(written, vec![
        dir.path().join("a_b.png"),
        dir.path().join("a_b-2.png"),
        dir.path().join("A_B-3.png"),
    ]);

    for (icon, path) in icons.iter().zip(&written) {
        assert_eq!(fs::read(path).unwrap(), icon.bytes);
    }
}

#[test]
fn test_save_keeps_case_variants_apart() {
    init();

    let dir = tempdir().unwrap();
    let store = IconStore::new(dir.path());
    let icons = icon_set(&[("Mail", &[1]), ("mail", &[2])]);

    let written = store.save(&icons).unwrap();

    assert_eq!(written, vec![dir.path().join("Mail.png"), dir.path().join("mail-2.png")]);
    assert_eq!(fs::read(&written[0]).unwrap(), vec![1]);
    assert_eq!(fs::read(&written[1]).unwrap(), vec![2]);
}
