//! Discovery inside jar archives

mod common;

use classglob_api::ResourceError;
use classglob_core::{ArchiveIndexCache, DiscoveryError, Namespace, ResourceDiscovery, ResourceSet};
use common::create_jar;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn jar_location(jar: &std::path::Path, pattern: &str) -> String {
    let url = url::Url::from_file_path(jar).unwrap();
    format!("jar:{url}!/{pattern}")
}

fn names(set: &ResourceSet) -> Vec<String> {
    set.filenames()
}

#[test]
fn test_recursive_versus_single_level_in_archive() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("lib.jar");
    create_jar(&jar, &["lib/a.txt", "lib/sub/b.txt", "lib/sub/c.java"]);
    let engine = ResourceDiscovery::default();

    let all = engine.resolve(&jar_location(&jar, "lib/**/*.txt")).unwrap();
    assert_eq!(names(&all), vec!["a.txt", "b.txt"]);

    let top = engine.resolve(&jar_location(&jar, "lib/*.txt")).unwrap();
    assert_eq!(names(&top), vec!["a.txt"]);
    assert_eq!(top.first().unwrap().read_to_string().unwrap(), "lib/a.txt");
}

#[test]
fn test_namespace_archive_roots() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("lib/app.jar");
    create_jar(
        &jar,
        &["META-INF/", "META-INF/app.properties", "META-INF/spring/x.properties", "com/acme/A.class"],
    );

    let engine = ResourceDiscovery::builder()
        .with_namespace(Namespace::from_lib_dir(&temp.path().join("lib")))
        .build();

    let set = engine.resolve("classpath*:META-INF/**/*.properties").unwrap();
    assert_eq!(names(&set), vec!["app.properties", "x.properties"]);
    assert!(set.iter().all(|r| r.exists() && r.is_readable()));

    // Single-root form yields namespace handles
    let set = engine.resolve("classpath:META-INF/*.properties").unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.first().unwrap().description(),
        "class path resource [META-INF/app.properties]"
    );
}

#[test]
fn test_shared_archive_index() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("lib.jar");
    create_jar(&jar, &["a/1.txt", "a/2.txt", "b/3.txt"]);
    let index = Arc::new(ArchiveIndexCache::new(4));

    let engine = ResourceDiscovery::builder()
        .add_root(&jar)
        .with_archive_index(index.clone())
        .build();

    let first = engine.resolve("classpath*:a/*.txt").unwrap();
    let second = engine.resolve("classpath*:b/*.txt").unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);

    let stats = index.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_corrupt_named_archive_fails() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("broken.jar");
    fs::write(&broken, b"not a zip archive").unwrap();

    let err = ResourceDiscovery::default()
        .resolve(&jar_location(&broken, "*.txt"))
        .unwrap_err();
    assert!(matches!(
        err,
        DiscoveryError::Resource(ResourceError::BackingIo { .. })
    ));
}
