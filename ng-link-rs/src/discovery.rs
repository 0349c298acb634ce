//! Enumerates the bundle files a link run operates on.

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use glob::Pattern;
use std::path::PathBuf;

/// Glob pattern matching every bundle under the configured bundle directory.
pub fn bundle_pattern(config: &LinkConfig) -> Result<String> {
    let base = config.base_dir.to_str().ok_or_else(|| {
        LinkError::Config(format!(
            "base directory `{}` is not valid UTF-8",
            config.base_dir.display()
        ))
    })?;
    let base = base.trim_end_matches(['/', '\\']);
    let base = if base.is_empty() {
        // base_dir was the filesystem root
        String::new()
    } else {
        Pattern::escape(base)
    };
    Ok(format!(
        "{base}/{}/**/*.{}",
        Pattern::escape(config.bundle_dir_name()),
        config.extension
    ))
}

/// Returns the bundles below `<base_dir>/<bundle_dir>` with the configured
/// extension, sorted by path.
///
/// Artifacts left by an earlier run (already carrying the linked suffix) are
/// skipped. A missing bundle directory yields an empty list.
pub fn discover_bundles(config: &LinkConfig) -> Result<Vec<PathBuf>> {
    let pattern = bundle_pattern(config)?;
    let suffix = config.suffix();

    let paths = glob::glob(&pattern)
        .map_err(|e| LinkError::Discovery(format!("invalid pattern `{pattern}`: {e}")))?;

    let mut bundles = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            LinkError::Discovery(format!("cannot read `{}`: {}", e.path().display(), e.error()))
        })?;
        if !path.is_file() {
            continue;
        }
        let already_linked = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&suffix));
        if already_linked {
            log::debug!("Skipping linked artifact {}", path.display());
            continue;
        }
        bundles.push(path);
    }
    bundles.sort();
    Ok(bundles)
}
