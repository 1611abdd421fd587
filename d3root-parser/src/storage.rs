//! Interface to the archive storage collaborator.
//!
//! The root decoders never touch disk or network themselves: everything is
//! pulled through this trait, which the surrounding storage engine
//! implements on top of its encoding table, archives and local cache.

use crate::Result;

/// 128-bit hash of file contents, the key into the encoding table.
pub type ContentHash = [u8; 16];

/// Opaque key addressing one decompressed blob inside the storage backend.
pub type StorageKey = Vec<u8>;

pub trait ContentStorage {
    /// Encoding-table lookup: content hash to storage key.
    ///
    /// Absence is fatal for the entry being loaded and should surface as
    /// [`crate::Error::ContentNotFound`].
    fn resolve_content_location(&self, content_hash: &ContentHash) -> Result<StorageKey>;

    /// Open a blob by storage key and return its decompressed bytes.
    fn open_by_storage_key(&mut self, key: &StorageKey) -> Result<Vec<u8>>;

    /// Probe the local cache before a direct open.
    ///
    /// `logical_path` namespaces the cached copy (it embeds the build name)
    /// and is not interpreted by this crate.
    fn try_cached_copy(
        &mut self,
        key: &StorageKey,
        content_hash: &ContentHash,
        logical_path: &str,
    ) -> Option<Vec<u8>>;

    /// Build/version identifier, used only to namespace logical cache paths.
    fn build_name(&self) -> &str;
}
