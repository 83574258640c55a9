//! Config patch/restore for subdirectory deployment.
//!
//! `configure` makes the minimum framework-specific change so a build
//! resolves its assets under a base path; `restore` puts every touched
//! file back exactly as it was. A full-text snapshot is recorded before
//! any write, so restoration never depends on the patch step having
//! understood the file.

mod cra;
mod next;
pub mod source;
mod vite;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::detect::{BuildProfile, Framework};
use crate::error::{Result, VorschauError};

/// Snapshot of one touched file.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatchRecord {
    /// File existed; holds its original full text.
    Original(String),
    /// File did not exist and was created; deleted on restore.
    Created,
}

/// Applies and reverts framework config changes for one project root.
///
/// At most one configure/restore cycle may be outstanding at a time;
/// a second `configure` without an intervening `restore` is rejected.
pub struct ConfigPatcher {
    root: PathBuf,
    records: BTreeMap<String, PatchRecord>,
    configured: bool,
}

impl ConfigPatcher {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            records: BTreeMap::new(),
            configured: false,
        }
    }

    /// True while a configure/restore cycle is outstanding. A failed
    /// `configure` still counts; its records need a `restore`.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Patch the project so a build serves correctly under `base_path`.
    ///
    /// On partial failure the records for already-patched files stay
    /// intact, so `restore` can still revert them.
    pub fn configure(&mut self, profile: &BuildProfile, base_path: &str) -> Result<()> {
        if self.configured {
            return Err(VorschauError::Patch {
                path: self.root.clone(),
                message: "configure called again without an intervening restore".to_string(),
            });
        }
        self.configured = true;

        match profile.framework {
            Framework::Next => next::apply(self, profile, base_path),
            Framework::Vite => vite::apply(self, profile, base_path),
            Framework::ReactCra => cra::apply(self, base_path),
            Framework::Generic => {
                tracing::info!(
                    "Generic project: asset paths may need manual base path configuration"
                );
                Ok(())
            }
        }
    }

    /// Put every touched file back. Each file is attempted independently;
    /// failures are collected and reported together. Calling this with
    /// nothing recorded is a no-op.
    pub fn restore(&mut self) -> Result<()> {
        self.configured = false;
        let records = std::mem::take(&mut self.records);
        let mut failures = Vec::new();

        for (rel, record) in records {
            let path = self.root.join(&rel);
            let outcome = match record {
                PatchRecord::Created => match std::fs::remove_file(&path) {
                    Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
                    _ => Ok(()),
                },
                PatchRecord::Original(text) => std::fs::write(&path, text),
            };
            if let Err(e) = outcome {
                failures.push(format!("{rel}: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(VorschauError::Restore(failures.join("; ")))
        }
    }

    /// Current text of a file under the root, if it exists.
    pub(crate) fn read_existing(&self, rel: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.root.join(rel)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VorschauError::Patch {
                path: self.root.join(rel),
                message: e.to_string(),
            }),
        }
    }

    /// Write `contents` to `rel`, snapshotting the original state first.
    /// The snapshot is taken at most once per file per cycle.
    pub(crate) fn write_patched(&mut self, rel: &str, contents: &str) -> Result<()> {
        let path = self.root.join(rel);

        if !self.records.contains_key(rel) {
            let record = match std::fs::read_to_string(&path) {
                Ok(original) => PatchRecord::Original(original),
                Err(e) if e.kind() == ErrorKind::NotFound => PatchRecord::Created,
                Err(e) => {
                    return Err(VorschauError::Patch {
                        path,
                        message: e.to_string(),
                    })
                }
            };
            self.records.insert(rel.to_string(), record);
        }

        std::fs::write(&path, contents).map_err(|e| VorschauError::Patch {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BUILD_COMMAND;

    fn profile(framework: Framework, config_file: Option<&str>) -> BuildProfile {
        BuildProfile {
            framework,
            build_command: BUILD_COMMAND.to_string(),
            output_dir: "dist".to_string(),
            config_file: config_file.map(str::to_string),
            static_export: false,
        }
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("next.config.js");
        let original = "// site config\nmodule.exports = {\n  reactStrictMode: true,\n};\n";
        std::fs::write(&config_path, original).unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher
            .configure(&profile(Framework::Next, Some("next.config.js")), "/pv")
            .unwrap();
        assert!(patcher.is_configured());
        assert_ne!(std::fs::read_to_string(&config_path).unwrap(), original);

        patcher.restore().unwrap();
        assert!(!patcher.is_configured());
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), original);
    }

    #[test]
    fn test_created_file_deleted_on_restore() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env.production.local");

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher
            .configure(&profile(Framework::ReactCra, None), "/pv")
            .unwrap();
        assert!(env_path.exists());

        patcher.restore().unwrap();
        assert!(!env_path.exists());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vite.config.js"), "export default {};\n").unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher
            .configure(&profile(Framework::Vite, Some("vite.config.js")), "/pv")
            .unwrap();
        patcher.restore().unwrap();
        patcher.restore().unwrap();
    }

    #[test]
    fn test_restore_tolerates_already_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env.production.local");

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher
            .configure(&profile(Framework::ReactCra, None), "/pv")
            .unwrap();
        std::fs::remove_file(&env_path).unwrap();

        patcher.restore().unwrap();
    }

    #[test]
    fn test_double_configure_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vite.config.js"), "export default {};\n").unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        let p = profile(Framework::Vite, Some("vite.config.js"));
        patcher.configure(&p, "/pv").unwrap();

        let err = patcher.configure(&p, "/pv").unwrap_err();
        assert!(matches!(err, VorschauError::Patch { .. }));
        assert!(err.to_string().contains("intervening restore"));
    }

    #[test]
    fn test_double_configure_rejected_without_records() {
        let dir = tempfile::tempdir().unwrap();

        // A generic configure touches no file, but the cycle still has
        // to be closed by a restore before the next one.
        let mut patcher = ConfigPatcher::new(dir.path());
        let p = profile(Framework::Generic, None);
        patcher.configure(&p, "/pv").unwrap();
        assert!(patcher.is_configured());

        let err = patcher.configure(&p, "/pv").unwrap_err();
        assert!(matches!(err, VorschauError::Patch { .. }));

        patcher.restore().unwrap();
        patcher.configure(&p, "/pv").unwrap();
    }

    #[test]
    fn test_generic_records_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher
            .configure(&profile(Framework::Generic, None), "/pv")
            .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        patcher.restore().unwrap();
    }

    #[test]
    fn test_partial_failure_keeps_earlier_records() {
        let dir = tempfile::tempdir().unwrap();
        let a_path = dir.path().join("a.js");
        std::fs::write(&a_path, "original a\n").unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher.write_patched("a.js", "patched a\n").unwrap();
        // Parent directory is missing, so this write fails after recording.
        assert!(patcher.write_patched("missing/b.js", "b\n").is_err());

        patcher.restore().unwrap();
        assert_eq!(std::fs::read_to_string(&a_path).unwrap(), "original a\n");
    }

    #[test]
    fn test_snapshot_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.js");
        std::fs::write(&path, "first\n").unwrap();

        let mut patcher = ConfigPatcher::new(dir.path());
        patcher.write_patched("conf.js", "second\n").unwrap();
        patcher.write_patched("conf.js", "third\n").unwrap();

        patcher.restore().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_read_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.js"), "text").unwrap();

        let patcher = ConfigPatcher::new(dir.path());
        assert_eq!(
            patcher.read_existing("present.js").unwrap().as_deref(),
            Some("text")
        );
        assert!(patcher.read_existing("absent.js").unwrap().is_none());
    }
}
