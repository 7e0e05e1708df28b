//! `classpath*:` discovery across several namespace roots

mod common;

use classglob_core::{Namespace, Resource, ResourceDiscovery};
use common::{create_jar, write_tree};
use std::fs;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    engine: ResourceDiscovery,
}

/// Namespace of: directory `first`, a missing directory, jar `lib.jar`,
/// directory `second`.
fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    write_tree(&first, &["config/app.xml", "config/nested/deep.xml", "config/readme.txt"]);
    write_tree(&second, &["config/other.xml"]);
    let jar = temp.path().join("lib.jar");
    create_jar(&jar, &["config/lib.xml", "config/nested/lib-deep.xml"]);

    let namespace = Namespace::new([
        first,
        temp.path().join("missing"),
        jar,
        second,
    ]);
    let engine = ResourceDiscovery::builder().with_namespace(namespace).build();
    Fixture {
        _temp: temp,
        engine,
    }
}

#[test]
fn test_matches_from_every_root_in_namespace_order() {
    let fixture = fixture();
    let set = fixture.engine.resolve("classpath*:config/*.xml").unwrap();
    assert_eq!(set.filenames(), vec!["app.xml", "lib.xml", "other.xml"]);
    assert!(set.skipped().is_empty());
}

#[test]
fn test_absent_root_does_not_hide_other_matches() {
    let fixture = fixture();
    let set = fixture.engine.resolve("classpath*:config/**/*.xml").unwrap();
    assert_eq!(
        set.filenames(),
        vec!["app.xml", "deep.xml", "lib.xml", "lib-deep.xml", "other.xml"]
    );
}

#[test]
fn test_kinds_follow_the_root() {
    let fixture = fixture();
    let set = fixture.engine.resolve("classpath*:config/*.xml").unwrap();
    let kinds: Vec<&str> = set
        .iter()
        .map(|r| match r {
            Resource::File(_) => "file",
            Resource::Url(_) => "url",
            Resource::Namespace(_) => "namespace",
        })
        .collect();
    assert_eq!(kinds, vec!["file", "url", "file"]);
}

#[test]
fn test_literal_aggregate_lists_each_root() {
    let fixture = fixture();
    let set = fixture.engine.resolve("classpath*:config/app.xml").unwrap();
    assert_eq!(set.len(), 1);

    let set = fixture.engine.resolve("classpath*:config").unwrap();
    assert_eq!(set.len(), 3);
}

#[test]
fn test_corrupt_archive_is_skipped_and_recorded() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("good");
    write_tree(&good, &["a.xml"]);
    let broken = temp.path().join("broken.jar");
    fs::write(&broken, b"not a zip archive").unwrap();

    let engine = ResourceDiscovery::builder()
        .add_root(&good)
        .add_root(&broken)
        .build();
    let set = engine.resolve("classpath*:*.xml").unwrap();

    assert_eq!(set.filenames(), vec!["a.xml"]);
    assert_eq!(set.skipped().len(), 1);
    assert!(set.skipped()[0].root.contains("broken.jar"));
}

#[test]
fn test_resolution_is_idempotent() {
    let fixture = fixture();
    let first = fixture.engine.resolve("classpath*:config/**/*.xml").unwrap();
    let second = fixture.engine.resolve("classpath*:config/**/*.xml").unwrap();
    assert_eq!(first.into_vec(), second.into_vec());
}

#[test]
fn test_literal_and_pattern_handles_deduplicate() {
    let fixture = fixture();
    let mut set = fixture.engine.resolve("classpath*:config/app.xml").unwrap();
    assert!(matches!(set.first(), Some(Resource::File(_))));

    set.merge(fixture.engine.resolve("classpath*:config/*.xml").unwrap());
    assert_eq!(set.filenames(), vec!["app.xml", "lib.xml", "other.xml"]);
}
