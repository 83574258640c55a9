//! Create React App detection.

use std::path::Path;

use regex::Regex;

use super::{sanitize_output_dir, BuildProfile, Framework, BUILD_COMMAND};
use crate::manifest::PackageManifest;

const DEFAULT_OUTPUT_DIR: &str = "build";

/// Env files consulted for a BUILD_PATH override, in CRA's production
/// precedence order.
const ENV_FILES: &[&str] = &[
    ".env.production.local",
    ".env.local",
    ".env.production",
    ".env",
];

/// A CRA project is recognized by a runtime dependency on react-scripts.
pub fn detect(root: &Path, manifest: &PackageManifest) -> Option<BuildProfile> {
    if !manifest.has_dependency("react-scripts") {
        return None;
    }

    let output_dir = build_path_override(root, manifest)
        .map(|dir| sanitize_output_dir(&dir, DEFAULT_OUTPUT_DIR))
        .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

    Some(BuildProfile {
        framework: Framework::ReactCra,
        build_command: BUILD_COMMAND.to_string(),
        output_dir,
        config_file: None,
        static_export: false,
    })
}

/// CRA redirects its output through the BUILD_PATH variable, either
/// inline in the build script or in an env file.
fn build_path_override(root: &Path, manifest: &PackageManifest) -> Option<String> {
    if let Some(script) = manifest.build_script() {
        if let Some(path) = build_path_from_script(script) {
            return Some(path);
        }
    }

    for name in ENV_FILES {
        let Ok(text) = std::fs::read_to_string(root.join(name)) else {
            continue;
        };
        if let Some(path) = build_path_from_env_text(&text) {
            return Some(path);
        }
    }

    None
}

fn build_path_from_script(script: &str) -> Option<String> {
    let re = Regex::new(r#"BUILD_PATH\s*=\s*('[^']*'|"[^"]*"|[^\s'"]+)"#).expect("valid regex");
    re.captures(script)
        .map(|caps| unquote(&caps[1]).to_string())
}

fn build_path_from_env_text(text: &str) -> Option<String> {
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("BUILD_PATH") {
            let rest = rest.trim_start();
            if let Some(value) = rest.strip_prefix('=') {
                return Some(unquote(value.trim()).to_string());
            }
        }
    }
    None
}

fn unquote(raw: &str) -> &str {
    let stripped = raw
        .strip_prefix('\'')
        .and_then(|r| r.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')))
        .unwrap_or(raw);
    stripped.strip_prefix("./").unwrap_or(stripped)
}
