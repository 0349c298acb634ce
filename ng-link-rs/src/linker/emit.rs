//! Core linking logic using the SWC parser and code generator.
//!
//! This module links a single bundle by:
//! 1. Parsing the bundle source into an SWC module
//! 2. Running the linker plugins and the specifier rewrite over that module
//! 3. Emitting the rewritten module back to JavaScript text

use std::path::Path;

use deno_ast::swc::ast::{EsVersion, Module};
use deno_ast::swc::codegen::text_writer::JsWriter;
use deno_ast::swc::codegen::{Config as CodegenConfig, Emitter};
use deno_ast::swc::common::comments::{Comments, SingleThreadedComments};
use deno_ast::swc::common::sync::Lrc;
use deno_ast::swc::common::{FileName, Globals, SourceMap, Spanned, GLOBALS};
use deno_ast::swc::ecma_visit::VisitMutWith;
use deno_ast::swc::parser::error::Error as ParseError;
use deno_ast::swc::parser::lexer::Lexer;
use deno_ast::swc::parser::{EsSyntax, Parser, StringInput, Syntax};

use super::plugin::TransformOptions;
use super::specifier_hook::SpecifierHook;
use super::text::strip_bom;
use crate::error::{LinkError, Result};

/// The result of linking one bundle.
#[derive(Debug)]
pub struct LinkEmit {
    /// The linked JavaScript code.
    pub code: String,
    /// How many relative specifiers were re-pointed at linked artifacts.
    pub rewritten_specifiers: usize,
}

/// Links one bundle's source text.
///
/// `path` only names the source for diagnostics. Fails on any parse
/// diagnostic, recoverable or not.
pub fn link_source(source: &str, path: &Path, options: &TransformOptions) -> Result<LinkEmit> {
    let source = strip_bom(source);
    let globals = Globals::new();

    GLOBALS.set(&globals, || {
        let source_map = Lrc::new(SourceMap::default());
        let comments = SingleThreadedComments::default();

        let mut module = parse_module(source, path, &source_map, &comments)?;

        for plugin in &options.plugins {
            log::debug!("Running linker plugin {} on {}", plugin.name(), path.display());
            let mut pass = plugin.create_pass(path);
            module.visit_mut_with(&mut *pass);
        }

        let mut hook = SpecifierHook::new(options.suffix.as_str());
        module.visit_mut_with(&mut hook);

        let comments: Option<&dyn Comments> = if options.preserve_comments {
            Some(&comments)
        } else {
            None
        };
        let code = emit_module(&module, path, &source_map, comments)?;

        Ok(LinkEmit {
            code,
            rewritten_specifiers: hook.rewritten(),
        })
    })
}

fn parse_module(
    source: &str,
    path: &Path,
    source_map: &Lrc<SourceMap>,
    comments: &SingleThreadedComments,
) -> Result<Module> {
    let source_file = source_map.new_source_file(
        FileName::Real(path.to_path_buf()).into(),
        source.to_string(),
    );

    let input = StringInput::from(&*source_file);
    let lexer = Lexer::new(
        Syntax::Es(EsSyntax::default()),
        EsVersion::EsNext,
        input,
        Some(comments),
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| parse_error(e, path, source_map))?;

    // A bundle with recoverable errors would still emit, but not faithfully.
    if let Some(e) = parser.take_errors().into_iter().next() {
        return Err(parse_error(e, path, source_map));
    }

    Ok(module)
}

fn parse_error(error: ParseError, path: &Path, source_map: &SourceMap) -> LinkError {
    let loc = source_map.lookup_char_pos(error.span().lo);
    LinkError::Parse {
        path: path.to_path_buf(),
        message: format!(
            "{} at {}:{}",
            error.kind().msg(),
            loc.line,
            loc.col_display + 1
        ),
    }
}

fn emit_module(
    module: &Module,
    path: &Path,
    source_map: &Lrc<SourceMap>,
    comments: Option<&dyn Comments>,
) -> Result<String> {
    let emit_error = |message: String| LinkError::Emit {
        path: path.to_path_buf(),
        message,
    };

    let mut buf = Vec::new();
    {
        let cfg = CodegenConfig::default()
            .with_minify(false)
            .with_target(EsVersion::EsNext)
            .with_omit_last_semi(false);

        let mut emitter = Emitter {
            cfg,
            cm: source_map.clone(),
            comments,
            wr: Box::new(JsWriter::new(source_map.clone(), "\n", &mut buf, None)),
        };

        emitter
            .emit_module(module)
            .map_err(|e| emit_error(e.to_string()))?;
    }

    String::from_utf8(buf).map_err(|e| emit_error(e.to_string()))
}
