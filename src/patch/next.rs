//! Next.js config patching.
//!
//! Layers static-export output, base path, asset prefix, trailing-slash
//! normalization, and disabled image optimization onto whatever object
//! the config exports. When the export shape is not recognizable the
//! fields are injected before the last closing brace instead, and a
//! config is synthesized from scratch when none exists.

use regex::Regex;

use super::{source, ConfigPatcher};
use crate::detect::BuildProfile;
use crate::error::Result;

const SYNTHESIZED_CONFIG: &str = "next.config.js";

pub(super) fn apply(
    patcher: &mut ConfigPatcher,
    profile: &BuildProfile,
    base_path: &str,
) -> Result<()> {
    let name = profile.config_file.as_deref().unwrap_or(SYNTHESIZED_CONFIG);
    let patched = match patcher.read_existing(name)? {
        Some(original) => patch_config(&original, base_path),
        None => synthesize_config(base_path),
    };
    patcher.write_patched(name, &patched)
}

fn export_fields(base_path: &str) -> [(&'static str, String); 5] {
    [
        ("output", "'export'".to_string()),
        ("basePath", format!("'{base_path}'")),
        ("assetPrefix", format!("'{base_path}'")),
        ("trailingSlash", "true".to_string()),
        ("images", "{ unoptimized: true }".to_string()),
    ]
}

fn patch_config(text: &str, base_path: &str) -> String {
    if let Some(open) = exported_object_start(text) {
        if let Some(close) = source::find_matching_brace(text, open) {
            let mut object = text[open..=close].to_string();
            for (key, value) in export_fields(base_path) {
                object = source::set_field(&object, key, &value);
            }
            return format!("{}{}{}", &text[..open], object, &text[close + 1..]);
        }
    }

    if text.rfind('}').is_some() {
        tracing::debug!("Cannot merge config object cleanly, injecting before last brace");
        let mut patched = text.to_string();
        for (key, value) in export_fields(base_path) {
            patched = source::insert_field(&patched, key, &value);
        }
        return patched;
    }

    tracing::debug!("No object literal in config, replacing it wholesale");
    synthesize_config(base_path)
}

/// Byte offset of the `{` opening the exported config object, covering
/// `module.exports = {`, `export default {`, and a named binding that is
/// exported afterwards.
fn exported_object_start(text: &str) -> Option<usize> {
    let direct = Regex::new(r"(?:module\.exports\s*=|export\s+default)\s*\{").expect("valid regex");
    if let Some(mat) = direct.find(text) {
        return Some(mat.end() - 1);
    }

    let binding = Regex::new(r"(?:const|let|var)\s+(\w+)\s*(?::\s*[\w.<>\[\], ]+?)?\s*=\s*\{")
        .expect("valid regex");
    for caps in binding.captures_iter(text) {
        let ident = &caps[1];
        let exported = match Regex::new(&format!(
            r"(?:module\.exports\s*=\s*{ident}\b|export\s+default\s+{ident}\b)"
        )) {
            Ok(re) => re,
            Err(_) => continue,
        };
        if exported.is_match(text) {
            if let Some(mat) = caps.get(0) {
                return Some(mat.end() - 1);
            }
        }
    }

    None
}

fn synthesize_config(base_path: &str) -> String {
    let mut config =
        String::from("/** Generated by vorschau for preview deployment. */\nmodule.exports = {\n");
    for (key, value) in export_fields(base_path) {
        config.push_str(&format!("  {key}: {value},\n"));
    }
    config.push_str("};\n");
    config
}
