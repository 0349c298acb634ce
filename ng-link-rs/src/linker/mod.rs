//! Bundle linker.
//!
//! Parses a pre-built bundle, applies the configured linker plugins and
//! re-points relative module specifiers at their linked artifacts, then
//! regenerates the source.
//!
//! # Architecture
//!
//! - `plugin`: The `LinkerPlugin` seam and the explicit transform options
//! - `specifier_hook`: Rewrites relative `import`/`export ... from` specifiers
//! - `emit`: Parse, run passes and generate code using SWC
//! - `text`: Utility functions for text processing

mod emit;
mod plugin;
mod specifier_hook;
mod text;

pub use emit::{link_source, LinkEmit};
pub use plugin::{LinkerPlugin, TransformOptions};
pub use specifier_hook::SpecifierHook;

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use std::path::{Path, PathBuf};

impl From<&LinkConfig> for TransformOptions {
    fn from(config: &LinkConfig) -> Self {
        TransformOptions::new(config.suffix())
    }
}

/// Reads `bundle`, links it and writes the result next to it under the
/// linked suffix, replacing any earlier artifact.
///
/// Returns the path of the written artifact.
pub async fn link_bundle(
    bundle: &Path,
    config: &LinkConfig,
    options: &TransformOptions,
) -> Result<PathBuf> {
    let source = tokio::fs::read_to_string(bundle)
        .await
        .map_err(|e| LinkError::io(bundle, e))?;

    let emit = link_source(&source, bundle, options)?;

    let target = config.linked_path(bundle);
    tokio::fs::write(&target, emit.code)
        .await
        .map_err(|e| LinkError::io(&target, e))?;

    log::info!(
        "Linked {} ({} specifier(s) rewritten)",
        target.display(),
        emit.rewritten_specifiers
    );
    Ok(target)
}
