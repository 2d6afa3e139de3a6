use std::{collections::BTreeMap, default::Default};

/// How the entry point is driven once exports are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// The entry method runs once, then the host's tick callback runs every tick
    PerTick,
    /// The entry method runs once and the loader is done
    RunToCompletion,
}

/// Settings handed to the embedded runtime when it is created
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Folder inside the manifest that holds the managed assemblies
    pub assembly_root: String,
    /// Debug level passed through to the runtime; 0 disables debugging
    pub debug_level: i32,
    /// Environment variables visible to managed code
    pub environment: BTreeMap<String, String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            assembly_root: "managed".to_string(),
            debug_level: 0,
            environment: BTreeMap::new(),
        }
    }
}

/// Contains Config properties which will be used by the Loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Assembly whose exports hold the entry point
    pub entry_assembly: String,
    /// Exported method invoked once the runtime is ready
    pub entry_method: String,
    pub entry_mode: EntryMode,
    /// Manifest path of a `<index>:<name>` symbol file used to translate
    /// stack traces, if one was bundled
    pub symbols_path: Option<String>,
    /// Text written in front of every console line
    pub console_prefix: String,
    /// Logs per-stage timings when enabled
    pub verbose_logging: bool,
    pub runtime: RuntimeConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            entry_assembly: "App".to_string(),
            entry_method: "Main".to_string(),
            entry_mode: EntryMode::PerTick,
            symbols_path: Some("dotnet.native.js.symbols".to_string()),
            console_prefix: "TICKBOOT ".to_string(),
            verbose_logging: false,
            runtime: RuntimeConfig::default(),
        }
    }
}
