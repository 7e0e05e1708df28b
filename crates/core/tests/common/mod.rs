#![allow(dead_code)]

use classglob_core::{DirEntry, DirectorySource, LocalDirectories};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write a jar with the given entries. Names ending in `/` become directory
/// entries; files contain their own name.
pub fn create_jar(path: &Path, entries: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for name in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(name.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// Create files (with their relative path as content) below `root`
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, file).unwrap();
    }
}

/// Records every directory listed through it
#[derive(Default)]
pub struct CountingDirectories {
    listed: Mutex<Vec<PathBuf>>,
}

impl CountingDirectories {
    pub fn listed(&self) -> Vec<PathBuf> {
        self.listed.lock().unwrap().clone()
    }

    pub fn was_listed(&self, dir: &Path) -> bool {
        self.listed.lock().unwrap().iter().any(|p| p == dir)
    }
}

impl DirectorySource for CountingDirectories {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        self.listed.lock().unwrap().push(dir.to_path_buf());
        LocalDirectories.list(dir)
    }
}
