//! Reader for the project's `package.json`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, VorschauError};

pub const MANIFEST_FILE: &str = "package.json";

/// The subset of package.json that detection cares about. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        let contents = std::fs::read_to_string(&path).map_err(|e| VorschauError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| VorschauError::Manifest {
            path,
            message: e.to_string(),
        })
    }

    pub fn build_script(&self) -> Option<&str> {
        self.scripts.get("build").map(String::as_str)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    pub fn has_dev_dependency(&self, name: &str) -> bool {
        self.dev_dependencies.contains_key(name)
    }
}
