use tickboot_shared::Encoding;

/// What the bundle is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A bare JSON array of manifest entries
    Json,
    /// An ES module exporting `manifest` and `config`
    #[default]
    Module,
}

impl OutputFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Json => "manifest.json",
            OutputFormat::Module => "bundle.mjs",
        }
    }
}

/// Contains Config properties which will be used by the Bundler
#[derive(Debug, Clone)]
pub struct BundlerConfig {
    /// Text codec used for every payload
    pub encoding: Encoding,
    /// Whether payloads are raw-DEFLATE compressed before encoding
    pub compress: bool,
    /// DEFLATE level, 0 (store) through 9 (best)
    pub level: u32,
    pub format: OutputFormat,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Base64,
            compress: true,
            level: 6,
            format: OutputFormat::default(),
        }
    }
}
