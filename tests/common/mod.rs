//! Shared fixtures: a small asset tree and a fake executable.

#![allow(dead_code)]

use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

pub const MOCK_EXE_SIZE: usize = 512;

/// Creates `<dir>/mock/` with the asset files the tests stuff, plus a
/// 512-byte fake executable at `<dir>/mock/mock.exe`.
///
/// ```text
/// mock/bar.txt          "bar"
/// mock/foo.txt          "foo\n"
/// mock/foofunc.txt      "foo - func\n"
/// mock/mock.exe         512 random bytes
/// mock/mock.go          "package main\n"
/// mock/subdir/baz.txt   "baz\n"
/// ```
pub fn mock_tree(dir: &Path) -> PathBuf {
    let mock = dir.join("mock");
    fs::create_dir_all(mock.join("subdir")).unwrap();
    fs::write(mock.join("bar.txt"), "bar").unwrap();
    fs::write(mock.join("foo.txt"), "foo\n").unwrap();
    fs::write(mock.join("foofunc.txt"), "foo - func\n").unwrap();
    fs::write(mock.join("mock.go"), "package main\n").unwrap();
    fs::write(mock.join("subdir/baz.txt"), "baz\n").unwrap();
    fake_exe(&mock.join("mock.exe"), MOCK_EXE_SIZE);
    mock
}

/// Writes `size` random bytes to `path`.
pub fn fake_exe(path: &Path, size: usize) -> Vec<u8> {
    let mut b = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut b);
    fs::write(path, &b).unwrap();
    b
}

/// `source:alias` spec string for a path.
pub fn spec(source: &Path, alias: &str) -> String {
    format!("{}:{}", source.display(), alias)
}

pub fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}
