use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use tickboot_shared::Manifest;

use crate::{
    config::{BundlerConfig, OutputFormat},
    encoder::ManifestEncoder,
    error::BundleError,
    mono_config::MonoConfig,
    writer,
};

pub const MONO_CONFIG_FILE: &str = "mono-config.json";

/// A finished manifest together with the config that describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub manifest: Manifest,
    pub config: MonoConfig,
}

impl Bundle {
    pub fn render(&self, format: OutputFormat) -> Result<String, BundleError> {
        match format {
            OutputFormat::Json => writer::render_json(&self.manifest),
            OutputFormat::Module => writer::render_module(&self.manifest, &self.config),
        }
    }

    /// Writes the bundle into `dir` under the format's file name and returns
    /// the path written.
    pub fn write_to(&self, dir: &Path, format: OutputFormat) -> Result<PathBuf, BundleError> {
        let path = dir.join(format.file_name());
        let text = self.render(format)?;
        fs::write(&path, text).map_err(|source| BundleError::Write {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

pub struct Bundler {
    encoder: ManifestEncoder,
}

impl Bundler {
    pub fn new(config: BundlerConfig) -> Result<Self, BundleError> {
        Ok(Self {
            encoder: ManifestEncoder::new(config)?,
        })
    }

    pub fn config(&self) -> &BundlerConfig {
        self.encoder.config()
    }

    /// Reads `mono-config.json` from an app bundle directory and packs every
    /// asset it lists that belongs in the manifest.
    pub fn bundle_dir(&self, app_bundle_dir: &Path) -> Result<Bundle, BundleError> {
        let config_path = app_bundle_dir.join(MONO_CONFIG_FILE);
        let config_text = fs::read_to_string(&config_path).map_err(|source| BundleError::Read {
            path: config_path,
            source,
        })?;
        let config = MonoConfig::from_json(&config_text)?;

        self.bundle_config(app_bundle_dir, config)
    }

    /// Packs the assets of an already-loaded config, reading their contents
    /// relative to `app_bundle_dir`.
    pub fn bundle_config(
        &self,
        app_bundle_dir: &Path,
        mut config: MonoConfig,
    ) -> Result<Bundle, BundleError> {
        config.retain_bundled();

        let mut manifest = Manifest::default();
        let mut total_bytes = 0;
        for asset in &config.assets {
            let local_path = asset.local_path();
            let source_path = app_bundle_dir.join(&local_path);
            let bytes = fs::read(&source_path).map_err(|source| BundleError::Read {
                path: source_path,
                source,
            })?;
            total_bytes += bytes.len();

            let entry = self
                .encoder
                .encode_file(&format!("./{local_path}"), &bytes)?;
            manifest.push(entry);
        }

        info!(
            "Bundled {} assets ({} bytes) from {}",
            manifest.len(),
            total_bytes,
            app_bundle_dir.display()
        );
        Ok(Bundle { manifest, config })
    }
}
