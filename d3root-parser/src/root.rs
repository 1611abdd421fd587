//! Root manifest reader and the namespace handler built on top of it.
//!
//! The load sequence is a single sequential pass: parse the root manifest,
//! open the `Base` sub-root and find `CoreTOC.dat` in its named section,
//! decode the catalog, then decode every manifest entry (including `Base`
//! itself) as an ordinary sub-root into the fingerprint index. After the
//! load everything is read-only; selecting a locale rebuilds the folder
//! tree from scratch.

use crate::coretoc::CoreToc;
use crate::index::{RootEntry, RootIndex};
use crate::ioutils::{ReadInt, read_cstring, read_content_hash};
use crate::jenkins3::hash_path;
use crate::locale::LocaleFlags;
use crate::storage::{ContentHash, ContentStorage};
use crate::subroot::SubRoot;
use crate::tree::{CascFolder, NameRegistry, build_tree};
use crate::{Error, Result};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Manifest key of the locale-independent sub-root carrying `CoreTOC.dat`.
const BASE_KEY: &str = "Base";

/// Named entry inside `Base` holding the catalog blob.
const CORE_TOC_NAME: &str = "CoreTOC.dat";

/// The top-level list of `{ content hash, key }` pairs naming every
/// sub-root of the build.
#[derive(Debug, Default)]
pub struct RootManifest {
    entries: Vec<(String, ContentHash)>,
}

impl RootManifest {
    /// Parse a root manifest stream: 4 reserved bytes, an `i32` count,
    /// then `count` records of `{ chash: 16 bytes, key: cstring }`.
    pub fn parse<R: Read>(f: &mut R) -> Result<Self> {
        let mut reserved = [0u8; 4];
        f.read_exact(&mut reserved)?;

        let count = f.read_i32le()?;
        let count = usize::try_from(count).map_err(|_| Error::CountOutOfRange(count))?;

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let content_hash = read_content_hash(f)?;
            let key = read_cstring(f)?;
            entries.push((key, content_hash));
        }

        debug!("root manifest lists {} sub-roots", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&ContentHash> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, hash)| hash)
    }

    /// Manifest entries in file order.
    pub fn entries(&self) -> &[(String, ContentHash)] {
        &self.entries
    }
}

/// The decoded root namespace of one build.
pub struct D3Root {
    toc: CoreToc,
    index: RootIndex,
    names: NameRegistry,
    locale: LocaleFlags,
    tree: Option<CascFolder>,
}

impl D3Root {
    /// Load the full namespace from a root manifest stream.
    pub fn load<S: ContentStorage, R: Read>(storage: &mut S, root: &mut R) -> Result<Self> {
        Self::load_cancellable(storage, root, &AtomicBool::new(false))
    }

    /// Like [`Self::load`], with an abort flag checked at every
    /// manifest-entry boundary. A raised flag surfaces as
    /// [`Error::Aborted`], distinct from any decode fault.
    pub fn load_cancellable<S: ContentStorage, R: Read>(
        storage: &mut S,
        root: &mut R,
        abort: &AtomicBool,
    ) -> Result<Self> {
        let manifest = RootManifest::parse(root)?;
        let base_hash = *manifest.get(BASE_KEY).ok_or(Error::BaseNotFound)?;
        debug!("Base sub-root content hash {}", hex::encode(base_hash));

        // The catalog is a hard prerequisite: without it no SNO name
        // resolves, so any failure on this path fails the whole load.
        let base_blob = open_sub_root(storage, BASE_KEY, &base_hash)?;
        let toc_hash = SubRoot::find_named_entry(&mut Cursor::new(&base_blob), CORE_TOC_NAME)?
            .ok_or(Error::CoreTocNotFound)?;
        let toc_key = storage.resolve_content_location(&toc_hash)?;
        let toc_blob = storage.open_by_storage_key(&toc_key)?;
        let toc = CoreToc::parse(&toc_blob)?;

        let mut index = RootIndex::default();
        for (key, content_hash) in manifest.entries() {
            if abort.load(Ordering::Relaxed) {
                return Err(Error::Aborted);
            }

            // Keys that aren't locale tags (Base included) apply everywhere
            let locales = LocaleFlags::from_tag(key).unwrap_or_else(LocaleFlags::any_locale);

            // Failures confined to one entry must not take down the rest
            // of the namespace.
            let blob = match open_sub_root(storage, key, content_hash) {
                Ok(blob) => blob,
                Err(e) => {
                    warn!("skipping sub-root {key:?}: {e}");
                    continue;
                }
            };
            match SubRoot::parse(&mut Cursor::new(&blob), locales, &toc) {
                Ok(entries) => {
                    debug!("sub-root {key:?}: {} records", entries.len());
                    for entry in entries {
                        index.insert(hash_path(&entry.name), entry);
                    }
                }
                Err(e) => warn!("sub-root {key:?} is malformed: {e}"),
            }
        }

        info!(
            "root namespace loaded: {} fingerprints, {} records",
            index.len(),
            index.total_len()
        );
        Ok(Self {
            toc,
            index,
            names: NameRegistry::default(),
            locale: LocaleFlags::new(),
            tree: None,
        })
    }

    /// Select a locale and return the materialized tree.
    ///
    /// The tree is fully rebuilt when the mask actually changes; repeated
    /// calls with the same mask return the existing tree untouched.
    pub fn set_locale(&mut self, locale: LocaleFlags) -> &CascFolder {
        if self.tree.is_none() || self.locale != locale {
            self.locale = locale;
            self.tree = Some(build_tree(&self.index, locale, &mut self.names));
        }
        match &self.tree {
            Some(tree) => tree,
            None => unreachable!("tree was built above"),
        }
    }

    /// Currently selected locale mask.
    pub fn locale(&self) -> LocaleFlags {
        self.locale
    }

    /// The last materialized tree, if a locale has been selected.
    pub fn tree(&self) -> Option<&CascFolder> {
        self.tree.as_ref()
    }

    /// Every record for a fingerprint, regardless of locale.
    pub fn all_entries(&self, fingerprint: u64) -> &[RootEntry] {
        self.index.entries(fingerprint)
    }

    /// Records for a fingerprint filtered by the currently selected
    /// locale. Unlike [`Self::all_entries`], this honours the filter.
    pub fn entries(&self, fingerprint: u64) -> impl Iterator<Item = &RootEntry> {
        let locale = self.locale;
        self.index
            .entries(fingerprint)
            .iter()
            .filter(move |e| (e.locales & locale).any())
    }

    /// Number of distinct fingerprints in the index.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// Number of records across all locales and sub-roots.
    pub fn count_total(&self) -> usize {
        self.index.total_len()
    }

    /// Number of file leaves in the last materialized tree.
    pub fn count_select(&self) -> usize {
        self.tree.as_ref().map_or(0, CascFolder::file_count)
    }

    /// The decoded catalog.
    pub fn catalog(&self) -> &CoreToc {
        &self.toc
    }

    /// Folder and file display names recorded during materialization.
    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// Drop the catalog, the index, the name registries and the tree.
    pub fn clear(&mut self) {
        self.toc = CoreToc::default();
        self.index.clear();
        self.names.clear();
        self.tree = None;
    }
}

/// Resolve and open one sub-root blob: encoding lookup, a single cache
/// probe, then a direct open.
fn open_sub_root<S: ContentStorage>(
    storage: &mut S,
    key: &str,
    content_hash: &ContentHash,
) -> Result<Vec<u8>> {
    let storage_key = storage.resolve_content_location(content_hash)?;
    let logical_path = format!("data\\{}\\subroot\\{}", storage.build_name(), key);
    if let Some(blob) = storage.try_cached_copy(&storage_key, content_hash, &logical_path) {
        return Ok(blob);
    }
    storage.open_by_storage_key(&storage_key)
}
