//! Vite config patching.
//!
//! Sets the top-level `base` field of the exported configuration and
//! makes sure `defineConfig` is importable when the file references it.

use regex::Regex;

use super::{source, ConfigPatcher};
use crate::detect::BuildProfile;
use crate::error::Result;

const SYNTHESIZED_CONFIG: &str = "vite.config.js";

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

fn patch_config(text: &str, base_path: &str) -> String {
    let value = base_value(base_path);

    if let Some(open) = config_object_start(text) {
        if let Some(close) = source::find_matching_brace(text, open) {
            let object = source::set_field(&text[open..=close], "base", &value);
            let patched = format!("{}{}{}", &text[..open], object, &text[close + 1..]);
            return ensure_define_config_import(patched);
        }
    }

    if text.rfind('}').is_some() {
        tracing::debug!("Cannot locate vite config object, injecting before last brace");
        return ensure_define_config_import(source::insert_field(text, "base", &value));
    }

    tracing::debug!("No object literal in config, replacing it wholesale");
    synthesize_config(base_path)
}

/// Vite expects `/` for a site served at the root.
fn base_value(base_path: &str) -> String {
    if base_path.is_empty() {
        "'/'".to_string()
    } else {
        format!("'{base_path}'")
    }
}

/// Byte offset of the `{` opening the exported config object.
fn config_object_start(text: &str) -> Option<usize> {
    let patterns = [
        r"defineConfig\s*\(\s*\{",
        r"export\s+default\s*\{",
        r"module\.exports\s*=\s*\{",
    ];
    for pattern in patterns {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        if let Some(mat) = re.find(text) {
            return Some(mat.end() - 1);
        }
    }
    None
}

/// Prepend an import for `defineConfig` when the file uses the helper
/// without importing it.
fn ensure_define_config_import(text: String) -> String {
    if !text.contains("defineConfig") {
        return text;
    }
    let imported = Regex::new(
        r#"import\s+[^;]*\bdefineConfig\b[^;]*from\s+['"]vite['"]|require\s*\(\s*['"]vite['"]\s*\)"#,
    )
    .expect("valid regex");
    if imported.is_match(&text) {
        text
    } else {
        format!("import {{ defineConfig }} from 'vite';\n{text}")
    }
}

fn synthesize_config(base_path: &str) -> String {
    format!(
        "import {{ defineConfig }} from 'vite';\n\nexport default defineConfig({{\n  base: {},\n  build: {{ outDir: 'dist' }},\n}});\n",
        base_value(base_path)
    )
}
