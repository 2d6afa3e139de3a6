use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BundleError;

const ASSEMBLY_BEHAVIOR: &str = "assembly";
const RUNTIME_BEHAVIOR: &str = "dotnetwasm";
const ASSEMBLY_EXTENSION: &str = "dll";
const ASSEMBLY_DIR: &str = "managed";

/// One asset listed by `mono-config.json`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonoAsset {
    #[serde(default)]
    pub behavior: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub virtual_path: Option<String>,
}

impl MonoAsset {
    pub fn new(behavior: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            behavior: behavior.into(),
            name: name.into(),
            virtual_path: None,
        }
    }

    /// Managed assemblies (`.dll`) and the runtime's own wasm module are
    /// bundled; everything else is left to the host.
    pub fn should_bundle(&self) -> bool {
        let is_assembly = self.behavior == ASSEMBLY_BEHAVIOR
            && Path::new(&self.name)
                .extension()
                .is_some_and(|extension| extension == ASSEMBLY_EXTENSION);
        is_assembly || self.behavior == RUNTIME_BEHAVIOR
    }

    /// Location of the asset relative to the app bundle directory, always
    /// with forward slashes.
    pub fn local_path(&self) -> String {
        let name = self.name.replace('\\', "/");
        if self.behavior == ASSEMBLY_BEHAVIOR {
            format!("{ASSEMBLY_DIR}/{name}")
        } else {
            name
        }
    }
}

fn default_debug_level() -> i32 {
    -1
}

/// The runtime configuration written next to a published app. Fields this
/// crate does not interpret are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonoConfig {
    #[serde(default)]
    pub main_assembly_name: String,
    #[serde(default)]
    pub assembly_root_folder: String,
    #[serde(default = "default_debug_level")]
    pub debug_level: i32,
    #[serde(default)]
    pub assets: Vec<MonoAsset>,
    #[serde(default)]
    pub remote_sources: Vec<String>,
    #[serde(default)]
    pub pthread_pool_size: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for MonoConfig {
    fn default() -> Self {
        Self {
            main_assembly_name: String::new(),
            assembly_root_folder: String::new(),
            debug_level: default_debug_level(),
            assets: Vec::new(),
            remote_sources: Vec::new(),
            pthread_pool_size: 0,
            extra: Map::new(),
        }
    }
}

impl MonoConfig {
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        serde_json::from_str(json).map_err(BundleError::MonoConfig)
    }

    pub fn to_json(&self) -> Result<String, BundleError> {
        serde_json::to_string(self).map_err(BundleError::Serialize)
    }

    pub fn bundled_assets(&self) -> impl Iterator<Item = &MonoAsset> {
        self.assets.iter().filter(|asset| asset.should_bundle())
    }

    /// Drops every asset that will not be bundled, so the emitted config
    /// only lists what the manifest carries.
    pub fn retain_bundled(&mut self) {
        self.assets.retain(MonoAsset::should_bundle);
    }
}
