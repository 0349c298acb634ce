//! Specifier rewriting for linked bundles.
//!
//! Re-points relative `import`/`export ... from` specifiers at the linked
//! artifact of the target module, so a linked bundle only ever loads other
//! linked bundles.

use deno_ast::swc::ast::{ModuleDecl, ModuleItem, Str};
use deno_ast::swc::ecma_visit::VisitMut;

use super::text::is_relative_specifier;

/// Pass that appends the linked suffix to every relative module specifier of
/// an import declaration, a re-export with a source, or a wildcard re-export.
///
/// Bare specifiers (package names) are left untouched. The suffix is appended
/// even if the specifier already ends with it.
pub struct SpecifierHook {
    suffix: String,
    rewritten: usize,
}

impl SpecifierHook {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            rewritten: 0,
        }
    }

    /// Number of specifiers rewritten so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    fn rewrite(&mut self, src: &mut Str) {
        let specifier = src.value.to_string_lossy();
        if !is_relative_specifier(&specifier) {
            return;
        }
        let linked = format!("{specifier}{}", self.suffix);
        log::debug!("Rewriting specifier {specifier} -> {linked}");
        *src = Str {
            span: src.span,
            value: linked.into(),
            raw: None,
        };
        self.rewritten += 1;
    }
}

impl VisitMut for SpecifierHook {
    // Statements can't hold static imports, so only module declarations matter.
    fn visit_mut_module_item(&mut self, item: &mut ModuleItem) {
        if let ModuleItem::ModuleDecl(decl) = item {
            self.visit_mut_module_decl(decl);
        }
    }

    fn visit_mut_module_decl(&mut self, decl: &mut ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.rewrite(&mut import.src),
            ModuleDecl::ExportNamed(export) => {
                if let Some(src) = export.src.as_deref_mut() {
                    self.rewrite(src);
                }
            }
            ModuleDecl::ExportAll(export) => self.rewrite(&mut export.src),
            _ => {}
        }
    }
}
