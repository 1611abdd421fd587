//! Locale-filtered folder tree and the shared display-name registries.
//!
//! Tree nodes are keyed by fingerprint only; display names live in a
//! [`NameRegistry`] owned by the loader and passed in explicitly. The
//! registries are append-only: a fingerprint keeps the first name recorded
//! for it, which is also how fingerprint collisions between unrelated
//! paths resolve everywhere in this crate — first write wins, because the
//! ecosystem's pre-computed fingerprints assume exactly that.

use crate::index::{RootEntry, RootIndex};
use crate::jenkins3::hash_path;
use crate::locale::LocaleFlags;
use crate::storage::ContentHash;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Separator used by synthesized and embedded names alike.
pub const PATH_SEPARATOR: char = '\\';

/// Display name of the synthetic root folder.
const ROOT_NAME: &str = "root";

#[derive(Debug, PartialEq, Eq)]
pub enum CascEntry {
    Folder(CascFolder),
    File(CascFile),
}

#[derive(Debug, PartialEq, Eq)]
pub struct CascFolder {
    pub hash: u64,
    /// Child fingerprint to child node.
    pub entries: HashMap<u64, CascEntry>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CascFile {
    pub hash: u64,
    pub content_hash: ContentHash,
}

impl CascFolder {
    pub fn new(hash: u64) -> Self {
        Self {
            hash,
            entries: HashMap::new(),
        }
    }

    pub fn entry(&self, hash: u64) -> Option<&CascEntry> {
        self.entries.get(&hash)
    }

    /// Number of file leaves in this folder and everything below it.
    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .map(|e| match e {
                CascEntry::Folder(folder) => folder.file_count(),
                CascEntry::File(_) => 1,
            })
            .sum()
    }
}

/// Append-only folder and file display names, keyed by fingerprint.
///
/// This is a denormalized lookup shared across rebuilds of the tree, not
/// an ownership relationship; it lives in the loader's context for one
/// load session.
#[derive(Debug, Default)]
pub struct NameRegistry {
    folders: HashMap<u64, String>,
    files: HashMap<u64, String>,
}

impl NameRegistry {
    /// Display name of a folder segment.
    pub fn folder_name(&self, hash: u64) -> Option<&str> {
        self.folders.get(&hash).map(String::as_str)
    }

    /// Full path of a file leaf.
    pub fn file_name(&self, hash: u64) -> Option<&str> {
        self.files.get(&hash).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.folders.clear();
        self.files.clear();
    }

    fn record_folder(&mut self, hash: u64, name: &str) {
        self.folders
            .entry(hash)
            .or_insert_with(|| name.to_string());
    }

    fn record_file(&mut self, hash: u64, name: &str) {
        self.files.entry(hash).or_insert_with(|| name.to_string());
    }
}

/// Collapse the index into one folder tree for the given locale filter.
///
/// Per fingerprint, the first-inserted record whose mask intersects
/// `locale` supplies the name and content hash; buckets with no
/// intersecting record produce no node at all. Every call builds a
/// complete new tree, so the result is idempotent for a fixed filter and
/// an unchanged index.
pub fn build_tree(index: &RootIndex, locale: LocaleFlags, names: &mut NameRegistry) -> CascFolder {
    let root_hash = hash_path(ROOT_NAME);
    names.record_folder(root_hash, ROOT_NAME);
    let mut root = CascFolder::new(root_hash);

    for (fingerprint, entries) in index.iter() {
        let Some(entry) = entries.iter().find(|e| (e.locales & locale).any()) else {
            continue;
        };
        insert_path(&mut root, fingerprint, entry, names);
    }

    debug!(
        "materialized {} files for locale mask {:#010x}",
        root.file_count(),
        u32::from(locale)
    );
    root
}

fn insert_path(root: &mut CascFolder, fingerprint: u64, record: &RootEntry, names: &mut NameRegistry) {
    let parts: Vec<&str> = record.name.split(PATH_SEPARATOR).collect();
    let mut folder = root;

    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            names.record_file(fingerprint, &record.name);
            folder
                .entries
                .entry(fingerprint)
                .or_insert_with(|| {
                    CascEntry::File(CascFile {
                        hash: fingerprint,
                        content_hash: record.content_hash,
                    })
                });
            return;
        }

        let hash = hash_path(part);
        names.record_folder(hash, part);
        let child = folder
            .entries
            .entry(hash)
            .or_insert_with(|| CascEntry::Folder(CascFolder::new(hash)));
        match child {
            CascEntry::Folder(f) => folder = f,
            CascEntry::File(_) => {
                // Fingerprint collision between a folder segment and an
                // existing file leaf; keep the first occupant.
                warn!("folder segment {part:?} collides with a file node, skipping descent");
                return;
            }
        }
    }
}
