//! Flat in-memory blob store used to fake raw content downloads.
//!
//! Paths are treated as opaque keys. Two spellings of the same URL path are
//! two different entries; no normalization happens here.

use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};

#[derive(Clone, Debug, Default)]
pub struct BlobStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `path`, or `NotFound` naming the path.
    pub fn get(&self, path: &str) -> StoreResult<&[u8]> {
        self.entries
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::not_found(path))
    }

    /// Copy the bytes stored at `path` into `out`.
    pub fn get_into<W: Write>(&self, path: &str, mut out: W) -> StoreResult<()> {
        let data = self.get(path)?;
        out.write_all(data)
            .and_then(|()| out.flush())
            .map_err(|err| StoreError::io(path, err))
    }

    /// Store `data` at `path`, replacing whatever was there.
    pub fn put(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        let data = data.into();
        tracing::debug!(path = %path, bytes = data.len(), "stored blob");
        self.entries.insert(path, data);
    }

    /// Drain `reader` to EOF and store the bytes at `path`.
    ///
    /// A read error aborts the call and leaves any previous entry in place.
    pub fn put_reader<R: Read>(&mut self, path: &str, mut reader: R) -> StoreResult<()> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|err| StoreError::io(path, err))?;
        self.put(path, buffer);
        Ok(())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
