use d3root_parser::Error;
use d3root_parser::jenkins3::hash_path;
use d3root_parser::locale::LocaleFlags;
use d3root_parser::root::{D3Root, RootManifest};
use d3root_parser::storage::{ContentHash, ContentStorage, StorageKey};
use d3root_parser::tree::CascEntry;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::AtomicBool;

const NUM_SNO_GROUPS: usize = 70;

const TOC_HASH: ContentHash = [0xAA; 16];
const BASE_HASH: ContentHash = [0xB0; 16];
const EN_US_HASH: ContentHash = [0xC0; 16];
const DE_DE_HASH: ContentHash = [0xD0; 16];

fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_cstr(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

/// Catalog with Actor 100 "Wizard" and Sound 200 "Thunder".
fn build_toc() -> Vec<u8> {
    let mut counts = [0i32; NUM_SNO_GROUPS];
    let mut offsets = [0i32; NUM_SNO_GROUPS];
    let mut body = Vec::new();

    counts[1] = 1;
    offsets[1] = 0;
    put_i32(&mut body, 1);
    put_i32(&mut body, 100);
    put_i32(&mut body, 0);
    put_cstr(&mut body, "Wizard");

    counts[40] = 1;
    offsets[40] = body.len() as i32;
    put_i32(&mut body, 40);
    put_i32(&mut body, 200);
    put_i32(&mut body, 0);
    put_cstr(&mut body, "Thunder");

    let mut blob = Vec::new();
    for count in counts {
        put_i32(&mut blob, count);
    }
    for offset in offsets {
        put_i32(&mut blob, offset);
    }
    for _ in 0..=NUM_SNO_GROUPS {
        put_i32(&mut blob, 0);
    }
    blob.extend_from_slice(&body);
    blob
}

fn build_subroot(
    sno: &[(ContentHash, i32)],
    seq: &[(ContentHash, i32, i32)],
    named: &[(ContentHash, &str)],
) -> Vec<u8> {
    let mut blob = Vec::new();
    blob.extend_from_slice(b"DIA3");

    put_i32(&mut blob, sno.len() as i32);
    for (chash, sno_id) in sno {
        blob.extend_from_slice(chash);
        put_i32(&mut blob, *sno_id);
    }

    put_i32(&mut blob, seq.len() as i32);
    for (chash, sno_id, sequence) in seq {
        blob.extend_from_slice(chash);
        put_i32(&mut blob, *sno_id);
        put_i32(&mut blob, *sequence);
    }

    put_i32(&mut blob, named.len() as i32);
    for (chash, name) in named {
        blob.extend_from_slice(chash);
        put_cstr(&mut blob, name);
    }

    blob
}

fn build_manifest(entries: &[(&str, ContentHash)]) -> Vec<u8> {
    let mut blob = vec![0u8; 4]; // reserved
    put_i32(&mut blob, entries.len() as i32);
    for (key, chash) in entries {
        blob.extend_from_slice(chash);
        put_cstr(&mut blob, key);
    }
    blob
}

/// In-memory stand-in for the storage collaborator. Storage keys are the
/// first half of the content hash; the cache never hits, so every open
/// counts one probe and one direct open.
#[derive(Default)]
struct MemoryStorage {
    encoding: HashMap<ContentHash, StorageKey>,
    blobs: HashMap<StorageKey, Vec<u8>>,
    cache_probes: usize,
    logical_paths: Vec<String>,
}

impl MemoryStorage {
    fn add(&mut self, content_hash: ContentHash, blob: Vec<u8>) {
        let key = content_hash[..8].to_vec();
        self.encoding.insert(content_hash, key.clone());
        self.blobs.insert(key, blob);
    }
}

impl ContentStorage for MemoryStorage {
    fn resolve_content_location(&self, content_hash: &ContentHash) -> d3root_parser::Result<StorageKey> {
        self.encoding
            .get(content_hash)
            .cloned()
            .ok_or_else(|| Error::ContentNotFound(hex::encode(content_hash)))
    }

    fn open_by_storage_key(&mut self, key: &StorageKey) -> d3root_parser::Result<Vec<u8>> {
        self.blobs
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no blob for key {}", hex::encode(key))))
    }

    fn try_cached_copy(
        &mut self,
        _key: &StorageKey,
        _content_hash: &ContentHash,
        logical_path: &str,
    ) -> Option<Vec<u8>> {
        self.cache_probes += 1;
        self.logical_paths.push(logical_path.to_string());
        None
    }

    fn build_name(&self) -> &str {
        "14633"
    }
}

/// Standard fixture: Base (CoreTOC.dat + one named file), enUS (one of
/// each id-keyed kind), deDE (another variant of Actor\Wizard).
fn fixture() -> (MemoryStorage, Vec<u8>) {
    let mut storage = MemoryStorage::default();
    storage.add(TOC_HASH, build_toc());
    storage.add(
        BASE_HASH,
        build_subroot(
            &[],
            &[],
            &[(TOC_HASH, "CoreTOC.dat"), ([0x77; 16], "Windows\\D3Debug.txt")],
        ),
    );
    storage.add(
        EN_US_HASH,
        build_subroot(&[([1; 16], 100)], &[([2; 16], 200, 7)], &[]),
    );
    storage.add(DE_DE_HASH, build_subroot(&[([4; 16], 100)], &[], &[]));

    let manifest = build_manifest(&[
        ("Base", BASE_HASH),
        ("enUS", EN_US_HASH),
        ("deDE", DE_DE_HASH),
    ]);
    (storage, manifest)
}

fn en_us() -> LocaleFlags {
    LocaleFlags::from_tag("enUS").unwrap()
}

fn de_de() -> LocaleFlags {
    LocaleFlags::from_tag("deDE").unwrap()
}

#[test]
fn manifest_round_trip() {
    let blob = build_manifest(&[("Base", BASE_HASH), ("enUS", EN_US_HASH)]);
    let manifest = RootManifest::parse(&mut Cursor::new(&blob)).unwrap();

    assert_eq!(manifest.entries().len(), 2);
    assert_eq!(manifest.get("Base"), Some(&BASE_HASH));
    assert_eq!(manifest.get("enUS"), Some(&EN_US_HASH));
    assert_eq!(manifest.get("frFR"), None);
    assert_eq!(manifest.entries()[0].0, "Base");
}

#[test]
fn full_load() {
    let _ = tracing_subscriber::fmt::try_init();
    let (mut storage, manifest) = fixture();

    let mut root = D3Root::load(&mut storage, &mut Cursor::new(&manifest)).unwrap();

    // Base contributes 2 named records, enUS 2, deDE 1; Actor\Wizard is
    // shared between enUS and deDE
    assert_eq!(root.count_total(), 5);
    assert_eq!(root.count(), 4);
    assert_eq!(root.catalog().len(), 2);

    // One cache probe per sub-root open (Base prerequisite scan plus the
    // three manifest entries); the CoreTOC blob is opened directly
    assert_eq!(storage.cache_probes, 4);
    assert!(
        storage
            .logical_paths
            .iter()
            .any(|p| p == "data\\14633\\subroot\\enUS")
    );

    let tree = root.set_locale(en_us());
    assert_eq!(tree.file_count(), 4);

    let wizard_fp = hash_path("Actor\\Wizard");
    let Some(CascEntry::Folder(actor)) = tree.entry(hash_path("Actor")) else {
        panic!("expected an Actor folder");
    };
    let Some(CascEntry::File(wizard)) = actor.entry(wizard_fp) else {
        panic!("expected a Wizard leaf");
    };
    // enUS was inserted before deDE, so its record wins under enUS
    assert_eq!(wizard.content_hash, [1; 16]);

    // Base's records carry the all-locales mask and sit at the root
    assert!(matches!(
        tree.entry(hash_path("CoreTOC.dat")),
        Some(CascEntry::File(_))
    ));
    assert_eq!(
        root.names().file_name(hash_path("Sound\\Thunder\\0007")),
        Some("Sound\\Thunder\\0007")
    );
    assert_eq!(root.count_select(), 4);

    // Same mask: no rebuild, same shape
    assert_eq!(root.set_locale(en_us()).file_count(), 4);

    // deDE drops the enUS-only sequence record and swaps the Wizard
    // variant
    let tree = root.set_locale(de_de());
    assert_eq!(tree.file_count(), 3);
    let Some(CascEntry::Folder(actor)) = tree.entry(hash_path("Actor")) else {
        panic!("expected an Actor folder");
    };
    let Some(CascEntry::File(wizard)) = actor.entry(wizard_fp) else {
        panic!("expected a Wizard leaf");
    };
    assert_eq!(wizard.content_hash, [4; 16]);
}

#[test]
fn lookup_variants() {
    let (mut storage, manifest) = fixture();
    let mut root = D3Root::load(&mut storage, &mut Cursor::new(&manifest)).unwrap();
    root.set_locale(de_de());

    let wizard_fp = hash_path("Actor\\Wizard");
    // Unfiltered: both locale variants
    assert_eq!(root.all_entries(wizard_fp).len(), 2);
    // Filtered by the selected locale: only the deDE record
    let filtered: Vec<_> = root.entries(wizard_fp).collect();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].content_hash, [4; 16]);

    assert!(root.all_entries(0xdead).is_empty());
}

#[test]
fn abort_is_distinct_from_faults() {
    let (mut storage, manifest) = fixture();
    let abort = AtomicBool::new(true);
    let result = D3Root::load_cancellable(&mut storage, &mut Cursor::new(&manifest), &abort);
    assert!(matches!(result, Err(Error::Aborted)));
}

#[test]
fn missing_base_is_fatal() {
    let (mut storage, _) = fixture();
    let manifest = build_manifest(&[("enUS", EN_US_HASH)]);
    let result = D3Root::load(&mut storage, &mut Cursor::new(&manifest));
    assert!(matches!(result, Err(Error::BaseNotFound)));
}

#[test]
fn missing_coretoc_is_fatal() {
    let mut storage = MemoryStorage::default();
    storage.add(
        BASE_HASH,
        build_subroot(&[], &[], &[([0x77; 16], "Windows\\D3Debug.txt")]),
    );
    let manifest = build_manifest(&[("Base", BASE_HASH)]);
    let result = D3Root::load(&mut storage, &mut Cursor::new(&manifest));
    assert!(matches!(result, Err(Error::CoreTocNotFound)));
}

#[test]
fn broken_entries_do_not_block_the_rest() {
    let (mut storage, _) = fixture();
    // frFR never got a blob registered; itIT's blob is truncated mid-record
    let it_it_hash: ContentHash = [0xE0; 16];
    let mut truncated = build_subroot(&[([5; 16], 100)], &[], &[]);
    truncated.truncate(truncated.len() - 3);
    storage.add(it_it_hash, truncated);

    let manifest = build_manifest(&[
        ("Base", BASE_HASH),
        ("frFR", [0x99; 16]),
        ("itIT", it_it_hash),
        ("enUS", EN_US_HASH),
    ]);

    let mut root = D3Root::load(&mut storage, &mut Cursor::new(&manifest)).unwrap();
    // Base + enUS records made it in, the two broken entries contributed
    // nothing
    assert_eq!(root.count_total(), 4);
    assert_eq!(root.set_locale(en_us()).file_count(), 4);
    assert_eq!(root.entries(hash_path("Actor\\Wizard")).count(), 1);
}

#[test]
fn clear_drops_everything() {
    let (mut storage, manifest) = fixture();
    let mut root = D3Root::load(&mut storage, &mut Cursor::new(&manifest)).unwrap();
    root.set_locale(en_us());
    assert!(root.count() > 0);

    root.clear();
    assert_eq!(root.count(), 0);
    assert_eq!(root.count_total(), 0);
    assert_eq!(root.count_select(), 0);
    assert!(root.tree().is_none());
    assert!(root.catalog().is_empty());
    assert!(root.names().file_name(hash_path("Actor\\Wizard")).is_none());
}
