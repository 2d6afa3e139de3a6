//! # Tickboot Bundler
//! Build-time half of tickboot: reads an app bundle's `mono-config.json`,
//! compresses and text-encodes every bundled asset, and writes the manifest
//! the loader consumes at startup.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod bundle;
mod config;
mod encoder;
mod error;
mod mono_config;
mod writer;

pub use bundle::{Bundle, Bundler, MONO_CONFIG_FILE};
pub use config::{BundlerConfig, OutputFormat};
pub use encoder::ManifestEncoder;
pub use error::BundleError;
pub use mono_config::{MonoAsset, MonoConfig};
pub use writer::{render_json, render_module};
