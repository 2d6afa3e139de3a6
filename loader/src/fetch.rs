use std::{future::Ready, rc::Rc};

use log::debug;
use serde_json::Value;

use tickboot_shared::FileMap;

const STATUS_OK: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;

/// Result of fetching a path from the decoded manifest.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    url: String,
    status: u16,
    body: Option<Rc<[u8]>>,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        self.body.is_some()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The file's bytes; empty for a missing file
    pub fn array_buffer(&self) -> &[u8] {
        self.body.as_deref().unwrap_or(&[])
    }

    /// Shared handle to the body, without copying it
    pub fn body(&self) -> Option<Rc<[u8]>> {
        self.body.clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.array_buffer()).into_owned()
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(self.array_buffer())
    }
}

/// Serves runtime resource requests from the [`FileMap`] instead of the
/// network. Every fetch resolves immediately.
#[derive(Debug, Clone)]
pub struct ResourceFetcher {
    files: Rc<FileMap>,
}

impl ResourceFetcher {
    pub fn new(files: Rc<FileMap>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Looks `path` up, answering 404 when it is not in the manifest
    pub fn fetch_now(&self, path: &str) -> FetchResponse {
        match self.files.get_shared(path) {
            Some(body) => FetchResponse {
                url: path.to_string(),
                status: STATUS_OK,
                body: Some(body),
            },
            None => {
                debug!("Fetch of '{}' missed the manifest", path);
                FetchResponse {
                    url: path.to_string(),
                    status: STATUS_NOT_FOUND,
                    body: None,
                }
            }
        }
    }

    /// Future-returning form expected by runtimes written against `fetch`.
    /// The future is already resolved.
    pub fn fetch(&self, path: &str) -> Ready<FetchResponse> {
        std::future::ready(self.fetch_now(path))
    }
}
