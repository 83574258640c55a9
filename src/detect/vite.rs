//! Vite detection.

use std::path::Path;

use regex::Regex;

use super::{sanitize_output_dir, BuildProfile, Framework, BUILD_COMMAND};
use crate::manifest::PackageManifest;

pub const CONFIG_FILES: &[&str] = &[
    "vite.config.js",
    "vite.config.ts",
    "vite.config.mjs",
    "vite.config.mts",
];
const DEFAULT_OUTPUT_DIR: &str = "dist";

/// A Vite project is recognized by its config file or by a declared dev
/// dependency on vite. Config file absence is tolerated here.
pub fn detect(root: &Path, manifest: &PackageManifest) -> Option<BuildProfile> {
    let config_file = CONFIG_FILES
        .iter()
        .copied()
        .find(|name| root.join(name).is_file());

    if config_file.is_none() && !manifest.has_dev_dependency("vite") {
        return None;
    }

    let output_dir = match config_file {
        Some(name) => match std::fs::read_to_string(root.join(name)) {
            Ok(text) => scan_out_dir(&text)
                .map(|dir| sanitize_output_dir(&dir, DEFAULT_OUTPUT_DIR))
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            Err(e) => {
                tracing::debug!("Cannot read {name}: {e}, assuming default output");
                DEFAULT_OUTPUT_DIR.to_string()
            }
        },
        None => DEFAULT_OUTPUT_DIR.to_string(),
    };

    Some(BuildProfile {
        framework: Framework::Vite,
        build_command: BUILD_COMMAND.to_string(),
        output_dir,
        config_file: config_file.map(str::to_string),
        static_export: false,
    })
}

/// Find a custom `outDir`, either nested under a `build` section or
/// written at the top level.
fn scan_out_dir(config_text: &str) -> Option<String> {
    let nested =
        Regex::new(r#"(?s)build\s*:\s*\{.*?outDir\s*:\s*['"]([^'"]+)['"]"#).expect("valid regex");
    if let Some(caps) = nested.captures(config_text) {
        return Some(caps[1].to_string());
    }

    let top_level = Regex::new(r#"outDir\s*:\s*['"]([^'"]+)['"]"#).expect("valid regex");
    top_level
        .captures(config_text)
        .map(|caps| caps[1].to_string())
}
