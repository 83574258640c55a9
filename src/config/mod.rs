//! Configuration loading for `vorschau.toml`.

pub mod defaults;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VorschauError};

pub const CONFIG_FILE: &str = "vorschau.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VorschauConfig {
    #[serde(default)]
    pub project: ProjectSection,
    pub previews: PreviewsSection,
    #[serde(default)]
    pub hosting: Option<HostingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name used in branch names and commit messages.
    /// Falls back to the package.json name, then the directory name.
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewsSection {
    /// Git URL of the repository that preview branches are pushed to.
    pub repo_url: String,
    #[serde(default = "defaults::branch_prefix")]
    pub branch_prefix: String,
    #[serde(default = "defaults::retention_days")]
    pub retention_days: i64,
    /// Base path the preview is served under. Defaults to "/<repo name>".
    #[serde(default)]
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingSection {
    /// Root URL of the hosting API, e.g. "https://git.example.com".
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Root URL of the Pages server; the preview is served under the
    /// base path below it.
    #[serde(default)]
    pub pages_url: Option<String>,
    /// API token. Prefer VORSCHAU_TOKEN over storing it here.
    #[serde(default)]
    pub token: Option<String>,
}

impl VorschauConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VorschauError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let config: VorschauConfig =
            toml::from_str(&contents).map_err(|e| VorschauError::ConfigInvalid {
                message: e.to_string(),
            })?;

        Ok(config)
    }

    pub fn load_from_root(root: &Path) -> Result<Self> {
        Self::load(&root.join(CONFIG_FILE))
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Resolve the base path previews are served under.
    ///
    /// Explicit `previews.base_path` wins, then the hosting repo name,
    /// then the final segment of the previews repo URL.
    pub fn base_path(&self) -> String {
        if let Some(raw) = &self.previews.base_path {
            return normalize_base_path(raw);
        }
        if let Some(hosting) = &self.hosting {
            return normalize_base_path(&hosting.repo);
        }
        match repo_stem(&self.previews.repo_url) {
            Some(stem) => normalize_base_path(&stem),
            None => String::new(),
        }
    }
}

/// Normalize a base path to the form "/segment" (or "" for the site root).
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Last path segment of a git URL, without any ".git" suffix.
pub(crate) fn repo_stem(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let stem = last.strip_suffix(".git").unwrap_or(last);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Extract (owner, repo) from a git URL like "https://host/owner/repo.git"
/// or "git@host:owner/repo.git".
pub(crate) fn parse_owner_repo(url: &str) -> Option<(String, String)> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let mut parts = trimmed.rsplit(['/', ':']);
    let repo = parts.next()?;
    let owner = parts.next()?;
    if repo.is_empty() || owner.is_empty() || owner.contains("://") {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config(previews_extra: &str, hosting: &str) -> VorschauConfig {
        let text = format!(
            "[previews]\nrepo_url = \"https://git.example.com/acme/site-previews.git\"\n{previews_extra}\n{hosting}"
        );
        toml::from_str(&text).unwrap()
    }

    #[test]
    fn test_load_minimal() {
        let config = minimal_config("", "");
        assert_eq!(config.previews.branch_prefix, "previews/");
        assert_eq!(config.previews.retention_days, 30);
        assert!(config.project.name.is_none());
        assert!(config.hosting.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VorschauConfig::load_from_root(dir.path()).unwrap_err();
        assert!(matches!(err, VorschauError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "previews = \"nope\"").unwrap();
        let err = VorschauConfig::load_from_root(dir.path()).unwrap_err();
        assert!(matches!(err, VorschauError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"acme-shop\"\n\n[previews]\nrepo_url = \"git@git.example.com:acme/previews.git\"\nbranch_prefix = \"pv/\"\nretention_days = 7\n",
        )
        .unwrap();
        let config = VorschauConfig::load_from_root(dir.path()).unwrap();
        assert_eq!(config.project.name.as_deref(), Some("acme-shop"));
        assert_eq!(config.previews.branch_prefix, "pv/");
        assert_eq!(config.previews.retention_days, 7);
    }

    #[test]
    fn test_base_path_explicit() {
        let config = minimal_config("base_path = \"shop/\"", "");
        assert_eq!(config.base_path(), "/shop");
    }

    #[test]
    fn test_base_path_explicit_root() {
        let config = minimal_config("base_path = \"/\"", "");
        assert_eq!(config.base_path(), "");
    }

    #[test]
    fn test_base_path_from_hosting_repo() {
        let config = minimal_config(
            "",
            "[hosting]\napi_url = \"https://git.example.com\"\nowner = \"acme\"\nrepo = \"site-previews\"\n",
        );
        assert_eq!(config.base_path(), "/site-previews");
    }

    #[test]
    fn test_base_path_from_repo_url() {
        let config = minimal_config("", "");
        assert_eq!(config.base_path(), "/site-previews");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("shop"), "/shop");
        assert_eq!(normalize_base_path("/shop/"), "/shop");
        assert_eq!(normalize_base_path("  /shop  "), "/shop");
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
    }

    #[test]
    fn test_repo_stem() {
        assert_eq!(
            repo_stem("https://git.example.com/acme/previews.git").as_deref(),
            Some("previews")
        );
        assert_eq!(
            repo_stem("git@git.example.com:acme/previews.git").as_deref(),
            Some("previews")
        );
        assert_eq!(repo_stem("previews"), Some("previews".to_string()));
        assert_eq!(repo_stem(""), None);
    }

    #[test]
    fn test_parse_owner_repo() {
        assert_eq!(
            parse_owner_repo("https://git.example.com/acme/previews.git"),
            Some(("acme".to_string(), "previews".to_string()))
        );
        assert_eq!(
            parse_owner_repo("git@git.example.com:acme/previews.git"),
            Some(("acme".to_string(), "previews".to_string()))
        );
        assert_eq!(parse_owner_repo("previews"), None);
    }
}
