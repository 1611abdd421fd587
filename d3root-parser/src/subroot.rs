//! Decoder for sub-root manifests, the per-locale record lists named by
//! the root manifest.
//!
//! A sub-root is a 4-byte magic (consumed, not validated) followed by
//! three sections, each prefixed with its own `i32` count:
//!
//! 1. id-keyed records `{ chash, sno_id }` — the path is synthesized as
//!    `Group\AssetName` through the catalog;
//! 2. id + sequence records `{ chash, sno_id, sequence }` — synthesized as
//!    `Group\AssetName\NNNN`. The true file extension is not recoverable
//!    from this data and is deliberately left off;
//! 3. named records `{ chash, name }` — the embedded path is used verbatim.

use crate::coretoc::{CoreToc, SnoGroup};
use crate::index::RootEntry;
use crate::ioutils::{ReadInt, read_cstring, read_content_hash};
use crate::locale::LocaleFlags;
use crate::storage::ContentHash;
use crate::{Error, Result};
use std::io::{Read, Seek};
use tracing::{debug, trace};

/// `{ chash, sno_id }`.
const SNO_RECORD_SIZE: i64 = 16 + 4;

/// `{ chash, sno_id, sequence }`.
const SEQ_RECORD_SIZE: i64 = 16 + 4 + 4;

pub struct SubRoot;

impl SubRoot {
    /// Decode one sub-root blob into records carrying `locales`.
    ///
    /// A catalog miss for a SNO id still produces a record with a
    /// placeholder group segment; only structural faults (truncation, bad
    /// counts) fail the blob, and they fail only this blob.
    pub fn parse<R: Read>(
        f: &mut R,
        locales: LocaleFlags,
        toc: &CoreToc,
    ) -> Result<Vec<RootEntry>> {
        let magic = f.read_u32le()?;
        trace!("sub-root magic {magic:#010x}");

        let mut entries = Vec::new();

        let count = read_count(f)?;
        for _ in 0..count {
            let content_hash = read_content_hash(f)?;
            let sno_id = f.read_i32le()?;
            entries.push(RootEntry {
                content_hash,
                name: sno_name(toc, sno_id),
                locales,
            });
        }

        let count = read_count(f)?;
        for _ in 0..count {
            let content_hash = read_content_hash(f)?;
            let sno_id = f.read_i32le()?;
            let sequence = f.read_i32le()?;
            entries.push(RootEntry {
                content_hash,
                name: format!("{}\\{sequence:04}", sno_name(toc, sno_id)),
                locales,
            });
        }

        let count = read_count(f)?;
        for _ in 0..count {
            let content_hash = read_content_hash(f)?;
            let name = read_cstring(f)?;
            entries.push(RootEntry {
                content_hash,
                name,
                locales,
            });
        }

        debug!("sub-root decoded: {} records", entries.len());
        Ok(entries)
    }

    /// Scan only the named-records section for an exact `wanted` match and
    /// return its content hash.
    ///
    /// The id-keyed sections are skipped over without decoding; the loader
    /// uses this to find `CoreTOC.dat` inside `Base` before the catalog
    /// exists.
    pub fn find_named_entry<R: Read + Seek>(
        f: &mut R,
        wanted: &str,
    ) -> Result<Option<ContentHash>> {
        let _magic = f.read_u32le()?;

        let count = read_count(f)?;
        f.seek_relative(i64::from(count) * SNO_RECORD_SIZE)?;

        let count = read_count(f)?;
        f.seek_relative(i64::from(count) * SEQ_RECORD_SIZE)?;

        let count = read_count(f)?;
        for _ in 0..count {
            let content_hash = read_content_hash(f)?;
            let name = read_cstring(f)?;
            if name == wanted {
                return Ok(Some(content_hash));
            }
        }

        Ok(None)
    }
}

fn read_count<R: Read>(f: &mut R) -> Result<u32> {
    let count = f.read_i32le()?;
    u32::try_from(count).map_err(|_| Error::CountOutOfRange(count))
}

/// `Group\AssetName` through the catalog; misses keep the record alive
/// with the same placeholder the game's tooling produces (`"0\"`).
fn sno_name(toc: &CoreToc, sno_id: i32) -> String {
    match toc.get(sno_id) {
        Some(info) => format!("{}\\{}", info.group, info.name),
        None => {
            trace!("SNO id {sno_id} is not in the catalog");
            format!("{}\\", SnoGroup::Unknown(0))
        }
    }
}
