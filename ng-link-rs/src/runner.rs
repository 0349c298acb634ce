//! Runs a whole link over one package.

use crate::config::LinkConfig;
use crate::discovery::discover_bundles;
use crate::error::{LinkError, Result};
use crate::linker::{link_bundle, TransformOptions};
use crate::manifest::{update_manifest, ManifestChanges};
use futures::future::LocalBoxFuture;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Linked artifacts written, sorted by path.
    pub artifacts: Vec<PathBuf>,
    pub manifest: ManifestChanges,
}

enum TaskOutput {
    Bundle(PathBuf),
    Manifest(ManifestChanges),
}

/// Links every bundle of the package and updates its manifest.
///
/// One task per bundle plus one manifest task run concurrently on the
/// current thread, at most `config.jobs` at a time. Every task runs to
/// completion; if any of them failed the run fails with
/// [`LinkError::Tasks`], even though the other tasks' files were written.
pub async fn link_package(config: &LinkConfig, options: &TransformOptions) -> Result<LinkReport> {
    config.validate()?;

    let bundles = discover_bundles(config)?;
    log::info!(
        "Found {} bundle(s) under {}",
        bundles.len(),
        config.base_dir.join(config.bundle_dir_name()).display()
    );

    let manifest_task: LocalBoxFuture<'_, Result<TaskOutput>> = async move {
        update_manifest(config).await.map(TaskOutput::Manifest)
    }
    .boxed_local();

    let bundle_tasks = bundles.iter().map(|bundle| {
        async move {
            link_bundle(bundle, config, options)
                .await
                .map(TaskOutput::Bundle)
        }
        .boxed_local()
    });

    let total = bundles.len() + 1;
    let tasks = std::iter::once(manifest_task).chain(bundle_tasks);
    let results: Vec<Result<TaskOutput>> = stream::iter(tasks)
        .buffer_unordered(config.jobs)
        .collect()
        .await;

    let mut report = LinkReport::default();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(TaskOutput::Bundle(artifact)) => report.artifacts.push(artifact),
            Ok(TaskOutput::Manifest(changes)) => report.manifest = changes,
            Err(err) => {
                log::error!("{err}");
                errors.push(err);
            }
        }
    }

    if !errors.is_empty() {
        return Err(LinkError::Tasks { total, errors });
    }

    report.artifacts.sort();
    log::info!(
        "Linked {} bundle(s), added {} export condition(s)",
        report.artifacts.len(),
        report.manifest.conditions.len()
    );
    Ok(report)
}
