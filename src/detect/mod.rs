//! Framework detection for front-end projects.
//!
//! Classifies a project directory into one of four framework variants and
//! works out where its build output will land. Detection only inspects the
//! local filesystem and the parsed package manifest; it never runs a
//! process or touches the network.

pub mod cra;
pub mod generic;
pub mod next;
pub mod vite;

use std::fmt;
use std::path::{Component, Path};

use serde::Serialize;

use crate::manifest::PackageManifest;
use crate::output::CommandOutput;

/// Every detected project is built through its declared package.json
/// `build` script.
pub const BUILD_COMMAND: &str = "npm run build";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Next,
    Vite,
    ReactCra,
    Generic,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Framework::Next => "Next.js",
            Framework::Vite => "Vite",
            Framework::ReactCra => "Create React App",
            Framework::Generic => "generic",
        };
        write!(f, "{name}")
    }
}

/// What detection learned about the project: which framework it uses,
/// how to build it, and where the static output lands.
#[derive(Debug, Clone, Serialize)]
pub struct BuildProfile {
    pub framework: Framework,
    pub build_command: String,
    /// Relative path under the project root. Never absolute, never
    /// parent-escaping, never empty.
    pub output_dir: String,
    /// Config file found at the project root, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    /// True for Next.js projects already configured for static export.
    pub static_export: bool,
}

impl CommandOutput for BuildProfile {
    fn human_display(&self) -> String {
        let framework = if self.static_export {
            format!("{} (static export)", self.framework)
        } else {
            self.framework.to_string()
        };
        let mut lines = vec![
            format!("Framework:        {framework}"),
            format!("Build command:    {}", self.build_command),
            format!("Output directory: {}", self.output_dir),
        ];
        if let Some(config) = &self.config_file {
            lines.push(format!("Config file:      {config}"));
        }
        lines.join("\n")
    }
}

/// Classify the project under `root`. First match wins; the order is
/// deliberate because signals can coexist (a Vite project may carry a
/// stray `dist/` directory, a Next project may pull in vite tooling).
pub fn detect_project(root: &Path, manifest: &PackageManifest) -> BuildProfile {
    if let Some(profile) = next::detect(root) {
        return profile;
    }
    if let Some(profile) = vite::detect(root, manifest) {
        return profile;
    }
    if let Some(profile) = cra::detect(root, manifest) {
        return profile;
    }
    generic::detect(root, manifest)
}

/// Accept an extracted output directory only if it is a plain relative
/// path; anything absolute, parent-escaping, or empty falls back to the
/// framework default.
pub(crate) fn sanitize_output_dir(candidate: &str, default: &str) -> String {
    let trimmed = candidate.trim();
    let unsafe_path = trimmed.is_empty()
        || trimmed.starts_with('/')
        || trimmed.starts_with('\\')
        || trimmed.contains(':')
        || Path::new(trimmed)
            .components()
            .any(|c| matches!(c, Component::ParentDir));
    if unsafe_path {
        tracing::debug!("Ignoring unsafe output directory {trimmed:?}, using {default:?}");
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
