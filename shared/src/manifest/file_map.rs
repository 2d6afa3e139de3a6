use std::{collections::BTreeMap, rc::Rc};

use super::error::ManifestError;

/// Strips any leading `./` so both spellings of a relative path address the
/// same file.
pub fn normalize_path(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path
}

/// Decoded manifest contents, keyed by logical path.
///
/// A `FileMap` is read-only once built. Buffers are reference counted so a
/// fetch response can hold on to one without copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    files: BTreeMap<String, Rc<[u8]>>,
    total_bytes: usize,
}

impl FileMap {
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(normalize_path(path)).map(|bytes| &bytes[..])
    }

    /// Shared handle to a file's bytes
    pub fn get_shared(&self, path: &str) -> Option<Rc<[u8]>> {
        self.files.get(normalize_path(path)).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(path, bytes)| (path.as_str(), &bytes[..]))
    }
}

/// Collects files as they are decoded, then freezes into a [`FileMap`].
#[derive(Default)]
pub(crate) struct FileMapBuilder {
    map: FileMap,
}

impl FileMapBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_insert(&mut self, path: &str, bytes: Vec<u8>) -> Result<(), ManifestError> {
        let path = normalize_path(path);
        if self.map.files.contains_key(path) {
            return Err(ManifestError::DuplicatePath {
                path: path.to_string(),
            });
        }
        self.map.total_bytes += bytes.len();
        self.map.files.insert(path.to_string(), Rc::from(bytes));
        Ok(())
    }

    pub(crate) fn build(self) -> FileMap {
        self.map
    }
}

impl<P: AsRef<str>> FromIterator<(P, Vec<u8>)> for FileMap {
    /// Builds a map directly from files. Later duplicates replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (P, Vec<u8>)>>(iter: I) -> Self {
        let mut map = FileMap::default();
        for (path, bytes) in iter {
            let path = normalize_path(path.as_ref()).to_string();
            map.total_bytes += bytes.len();
            if let Some(previous) = map.files.insert(path, Rc::from(bytes)) {
                map.total_bytes -= previous.len();
            }
        }
        map
    }
}
