//! # Path Resolver
//!
//! Turns `source` / `source:alias` file specifications into the files they
//! name and the virtual paths those files take inside the filesystem.
//!
//! - A file source maps to `root + source`, or to the alias verbatim.
//! - A directory source is walked recursively. Each descendant maps to
//!   `root + source/rel`, or to `root + alias/rel` when aliased, so
//!   `assets/:/static` mounts `assets/css/a.css` as `/static/css/a.css`.
//!
//! Virtual paths are always absolute, forward-slash and dot-cleaned,
//! whatever separators the host uses.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use walkdir::WalkDir;

use crate::common::FileMetadata;
use crate::error::{Result, StuffError};

/// Separates a source path from its alias.
pub const ALIAS_SEPARATOR: char = ':';

/// A parsed `source[:alias]` specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub source: PathBuf,
    /// Normalized alias, if one was given.
    pub alias: Option<String>,
}

impl FromStr for FileSpec {
    type Err = StuffError;

    fn from_str(s: &str) -> Result<Self> {
        let chunks: Vec<&str> = s.split(ALIAS_SEPARATOR).collect();
        if chunks.len() > 2 {
            return Err(StuffError::InvalidSpec(s.to_string()));
        }
        let source = if chunks[0].is_empty() { "." } else { chunks[0] };
        Ok(Self {
            source: PathBuf::from(source),
            alias: chunks.get(1).map(|a| clean_path("/", a)),
        })
    }
}

/// One resolved file: where it lives on disk and where it is mounted.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub source: PathBuf,
    pub target: String,
    pub metadata: FileMetadata,
}

/// Lazy iterator over the files named by a list of specifications.
///
/// The first error is yielded once and ends the iteration.
pub struct Resolver {
    root: String,
    specs: VecDeque<String>,
    dir: Option<DirWalk>,
    done: bool,
}

struct DirWalk {
    source: PathBuf,
    alias: Option<String>,
    iter: walkdir::IntoIter,
}

impl Resolver {
    pub fn new<I, S>(root: &str, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root: root.to_string(),
            specs: specs.into_iter().map(|s| s.as_ref().to_string()).collect(),
            dir: None,
            done: false,
        }
    }

    fn next_spec(&mut self, raw: &str) -> Result<Option<WalkEntry>> {
        let spec: FileSpec = raw.parse()?;
        let stat = fs::metadata(&spec.source).map_err(|e| StuffError::io(&spec.source, e))?;

        if stat.is_dir() {
            self.dir = Some(DirWalk {
                iter: WalkDir::new(&spec.source)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter(),
                source: spec.source,
                alias: spec.alias,
            });
            return Ok(None);
        }

        let target = match spec.alias {
            Some(alias) => alias,
            None => clean_path(&self.root, &path_str(&spec.source)),
        };
        Ok(Some(WalkEntry {
            metadata: FileMetadata::from(&stat),
            source: spec.source,
            target,
        }))
    }

    fn next_in_dir(&mut self) -> Option<Result<WalkEntry>> {
        let walk = self.dir.as_mut()?;
        for entry in walk.iter.by_ref() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => return Some(Err(e.into())),
            };
            if entry.file_type().is_dir() {
                continue;
            }
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(e) => return Some(Err(e.into())),
            };

            let target = match &walk.alias {
                Some(alias) => {
                    let rel = entry.path().strip_prefix(&walk.source).unwrap_or(entry.path());
                    clean_path(&self.root, &format!("{}/{}", alias, path_str(rel)))
                }
                None => clean_path(&self.root, &path_str(entry.path())),
            };
            return Some(Ok(WalkEntry {
                source: entry.into_path(),
                target,
                metadata: FileMetadata::from(&meta),
            }));
        }
        self.dir = None;
        None
    }
}

impl Iterator for Resolver {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(item) = self.next_in_dir() {
                match &item {
                    Ok(entry) => tracing::debug!(source = %entry.source.display(), target = %entry.target, "resolved"),
                    Err(_) => self.done = true,
                }
                return Some(item);
            }

            let raw = self.specs.pop_front()?;
            match self.next_spec(&raw) {
                Ok(Some(entry)) => {
                    tracing::debug!(source = %entry.source.display(), target = %entry.target, "resolved");
                    return Some(Ok(entry));
                }
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Resolves every specification eagerly.
pub fn resolve<I, S>(root: &str, specs: I) -> Result<Vec<WalkEntry>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Resolver::new(root, specs).collect()
}

fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

/// Normalizes `p` into an absolute virtual path mounted under `root`.
///
/// `p` is cleaned as if rooted at `/` before it is joined, so `..` segments
/// in it can never climb above `root`.
pub fn clean_path(root: &str, p: &str) -> String {
    let root = if root.is_empty() { "/" } else { root };
    let p = clean(&strip_volume(&p.replace('\\', "/")));
    let root = strip_volume(&root.replace('\\', "/"));
    clean(&format!("{}/{}", root, p))
}

fn strip_volume(p: &str) -> String {
    let trimmed = p.trim_start_matches('/');
    let b = trimmed.as_bytes();
    if b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':' {
        return trimmed[2..].to_string();
    }
    p.to_string()
}

/// Lexical clean of a path treated as rooted at `/`.
fn clean(p: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in p.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}
