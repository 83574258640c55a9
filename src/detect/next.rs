//! Next.js detection.

use std::path::Path;

use regex::Regex;

use super::{sanitize_output_dir, BuildProfile, Framework, BUILD_COMMAND};

pub const CONFIG_FILES: &[&str] = &["next.config.js", "next.config.mjs", "next.config.ts"];
const EXPORT_OUTPUT_DIR: &str = "out";
const DEFAULT_OUTPUT_DIR: &str = ".next";

/// A Next.js project is recognized by its config file at the project root.
pub fn detect(root: &Path) -> Option<BuildProfile> {
    let config_file = CONFIG_FILES
        .iter()
        .copied()
        .find(|name| root.join(name).is_file())?;

    let config_text = match std::fs::read_to_string(root.join(config_file)) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Cannot read {config_file}: {e}, assuming default build");
            String::new()
        }
    };

    let static_export = has_static_export(&config_text);
    let output_dir = match scan_dist_dir(&config_text) {
        Some(dist_dir) => {
            let default = if static_export {
                EXPORT_OUTPUT_DIR
            } else {
                DEFAULT_OUTPUT_DIR
            };
            sanitize_output_dir(&dist_dir, default)
        }
        None if static_export => EXPORT_OUTPUT_DIR.to_string(),
        None => DEFAULT_OUTPUT_DIR.to_string(),
    };

    Some(BuildProfile {
        framework: Framework::Next,
        build_command: BUILD_COMMAND.to_string(),
        output_dir,
        config_file: Some(config_file.to_string()),
        static_export,
    })
}

fn has_static_export(config_text: &str) -> bool {
    let re = Regex::new(r#"output\s*:\s*['"]export['"]"#).expect("valid regex");
    re.is_match(config_text)
}

fn scan_dist_dir(config_text: &str) -> Option<String> {
    let re = Regex::new(r#"distDir\s*:\s*['"]([^'"]+)['"]"#).expect("valid regex");
    re.captures(config_text)
        .map(|caps| caps[1].to_string())
}
