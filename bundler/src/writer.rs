use tickboot_shared::Manifest;

use crate::{error::BundleError, mono_config::MonoConfig};

/// Renders the manifest alone as a JSON array.
pub fn render_json(manifest: &Manifest) -> Result<String, BundleError> {
    serde_json::to_string_pretty(manifest).map_err(BundleError::Serialize)
}

/// Renders an ES module with one manifest entry per line, followed by the
/// filtered runtime config:
///
/// ```text
/// export const manifest = [
///   {"path":"./managed/App.dll","b64":"...","compressed":true,"originalSize":4096,"crc32":...},
/// ];
/// export const config = {...};
/// ```
pub fn render_module(manifest: &Manifest, config: &MonoConfig) -> Result<String, BundleError> {
    let mut out = String::from("export const manifest = [\n");
    for entry in manifest.entries() {
        let line = serde_json::to_string(entry).map_err(BundleError::Serialize)?;
        out.push_str(&format!("  {line},\n"));
    }
    out.push_str("];\n");
    out.push_str(&format!("export const config = {};\n", config.to_json()?));
    Ok(out)
}
