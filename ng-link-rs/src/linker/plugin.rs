use deno_ast::swc::ecma_visit::VisitMut;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A linker rewrite applied to every bundle of a run.
///
/// Each bundle gets a fresh pass from [`LinkerPlugin::create_pass`], so a
/// pass may keep per-file state. Passes run over the already parsed module in
/// registration order, before the specifier rewrite.
pub trait LinkerPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn create_pass(&self, file: &Path) -> Box<dyn VisitMut>;
}

/// Explicit inputs of the bundle transform.
///
/// Nothing outside this struct influences the output: there is no config
/// file or environment lookup.
#[derive(Clone)]
pub struct TransformOptions {
    /// Linker plugins, applied in order.
    pub plugins: Vec<Arc<dyn LinkerPlugin>>,
    /// Suffix appended to relative specifiers, e.g. `.linked.mjs`.
    pub suffix: String,
    /// Keep comments such as license banners and `/*#__PURE__*/` markers.
    pub preserve_comments: bool,
}

impl TransformOptions {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            plugins: Vec::new(),
            suffix: suffix.into(),
            preserve_comments: true,
        }
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn LinkerPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("suffix", &self.suffix)
            .field("preserve_comments", &self.preserve_comments)
            .finish()
    }
}
