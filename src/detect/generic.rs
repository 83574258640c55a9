//! Generic fallback detection. Always produces a profile.

use std::path::Path;

use regex::Regex;

use super::{BuildProfile, Framework, BUILD_COMMAND};
use crate::manifest::PackageManifest;

/// Output directories to look for, in priority order.
const CANDIDATE_DIRS: &[&str] = &["dist", "build", "out", "public"];
const FALLBACK_OUTPUT_DIR: &str = "dist";

pub fn detect(root: &Path, manifest: &PackageManifest) -> BuildProfile {
    let output_dir = dir_from_build_script(manifest)
        .or_else(|| existing_candidate(root))
        .unwrap_or_else(|| FALLBACK_OUTPUT_DIR.to_string());

    BuildProfile {
        framework: Framework::Generic,
        build_command: BUILD_COMMAND.to_string(),
        output_dir,
        config_file: None,
        static_export: false,
    }
}

/// Look for a candidate directory name mentioned in the build script.
/// Heuristic only; the extracted name is a hint, not ground truth.
fn dir_from_build_script(manifest: &PackageManifest) -> Option<String> {
    let script = manifest.build_script()?;
    for dir in CANDIDATE_DIRS {
        let re = match Regex::new(&format!(r"\b{dir}\b")) {
            Ok(re) => re,
            Err(_) => continue,
        };
        if re.is_match(script) {
            return Some((*dir).to_string());
        }
    }
    None
}

fn existing_candidate(root: &Path) -> Option<String> {
    CANDIDATE_DIRS
        .iter()
        .copied()
        .find(|dir| root.join(dir).is_dir())
        .map(str::to_string)
}
