//! Locations without a literal root resolve against the working directory.
//! Kept in its own test binary because it changes the process directory.

mod common;

use classglob_core::{LoaderPolicy, ResourceDiscovery};
use common::write_tree;
use std::env;
use tempfile::TempDir;

#[test]
fn test_empty_root_is_the_current_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    write_tree(&root, &["a.txt", "b.xml", "sub/c.txt"]);

    let engine = ResourceDiscovery::builder()
        .with_policy(LoaderPolicy::FilesystemFirst)
        .build();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(&root).unwrap();
    let with_scheme = engine.resolve("file:*.txt");
    let bare = engine.resolve("*.txt");
    let recursive = engine.resolve("file:**/*.txt");
    env::set_current_dir(previous).unwrap();

    let with_scheme = with_scheme.unwrap();
    assert_eq!(with_scheme.filenames(), vec!["a.txt"]);
    assert_eq!(
        with_scheme.first().unwrap().file_path(),
        Some(root.join("a.txt"))
    );
    assert_eq!(bare.unwrap().filenames(), vec!["a.txt"]);
    assert_eq!(recursive.unwrap().filenames(), vec!["a.txt", "c.txt"]);
}
