//! Fingerprint-keyed multi-map over every decoded root record.
//!
//! Different real paths can collide on one fingerprint, and the same path
//! shows up once per locale it ships in; both cases land in the same
//! bucket. Per-bucket insertion order is preserved because the first
//! inserted record wins ties at materialization. The index is written only
//! during the load phase and read-only afterwards.

use crate::locale::LocaleFlags;
use crate::storage::ContentHash;
use std::collections::HashMap;

/// One resolvable file in the namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootEntry {
    /// Content hash, the key into the storage encoding table.
    pub content_hash: ContentHash,
    /// Full path, synthesized from the catalog or embedded verbatim.
    pub name: String,
    /// Locales this variant applies to; never the empty mask.
    pub locales: LocaleFlags,
}

#[derive(Debug, Default)]
pub struct RootIndex {
    buckets: HashMap<u64, Vec<RootEntry>>,
}

impl RootIndex {
    pub fn insert(&mut self, fingerprint: u64, entry: RootEntry) {
        self.buckets.entry(fingerprint).or_default().push(entry);
    }

    /// Records sharing a fingerprint, in insertion order.
    pub fn entries(&self, fingerprint: u64) -> &[RootEntry] {
        self.buckets.get(&fingerprint).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[RootEntry])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of records across all fingerprints.
    pub fn total_len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
