use crate::error::{LinkError, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_BUNDLE_DIR: &str = "fesm2022";
pub const DEFAULT_EXTENSION: &str = "mjs";
pub const DEFAULT_CONDITION: &str = "ng-linked";
pub const DEFAULT_MANIFEST: &str = "package.json";
pub const DEFAULT_JOBS: usize = 64;

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '!'];

/// Settings for a single link run over one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Package root holding the bundle directory and the manifest.
    pub base_dir: PathBuf,
    /// Bundle directory relative to `base_dir`, e.g. `fesm2022`.
    pub bundle_dir: String,
    /// Bundle file extension without the leading dot.
    pub extension: String,
    /// Export condition pointing at the linked artifacts.
    pub condition: String,
    /// Manifest file name relative to `base_dir`.
    pub manifest: String,
    /// Upper bound on tasks in flight at once.
    pub jobs: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            bundle_dir: DEFAULT_BUNDLE_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            condition: DEFAULT_CONDITION.to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            jobs: DEFAULT_JOBS,
        }
    }
}

impl LinkConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Bundle directory without a leading `./` or trailing slash.
    pub fn bundle_dir_name(&self) -> &str {
        self.bundle_dir
            .trim_start_matches("./")
            .trim_end_matches(['/', '\\'])
    }

    /// Suffix appended to a bundle path to name its linked artifact.
    pub fn suffix(&self) -> String {
        format!(".linked.{}", self.extension)
    }

    /// Appends the linked suffix to `path`.
    pub fn linked_name(&self, path: &str) -> String {
        format!("{path}{}", self.suffix())
    }

    pub fn linked_path(&self, bundle: &Path) -> PathBuf {
        let mut name = bundle.as_os_str().to_owned();
        name.push(self.suffix());
        PathBuf::from(name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir.join(&self.manifest)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("bundle directory", &self.bundle_dir),
            ("extension", &self.extension),
            ("condition", &self.condition),
            ("manifest", &self.manifest),
        ] {
            if value.trim().is_empty() {
                return Err(LinkError::Config(format!("{field} must not be empty")));
            }
        }
        for (field, value) in [
            ("bundle directory", &self.bundle_dir),
            ("extension", &self.extension),
        ] {
            if value.contains(GLOB_META) {
                return Err(LinkError::Config(format!(
                    "{field} `{value}` must not contain glob characters"
                )));
            }
        }
        if self.bundle_dir_name().is_empty() {
            return Err(LinkError::Config(format!(
                "bundle directory `{}` must name a directory below the base directory",
                self.bundle_dir
            )));
        }
        if self.extension.starts_with('.') {
            return Err(LinkError::Config(format!(
                "extension `{}` must be given without a leading dot",
                self.extension
            )));
        }
        if self.jobs == 0 {
            return Err(LinkError::Config("jobs must be at least 1".to_string()));
        }
        Ok(())
    }
}
