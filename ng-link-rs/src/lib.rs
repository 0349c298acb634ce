#![doc = include_str!("../README.md")]

pub mod config;
pub mod discovery;
pub mod error;
pub mod linker;
pub mod manifest;
pub mod runner;

pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use linker::{LinkerPlugin, TransformOptions};
pub use manifest::ManifestChanges;
pub use runner::{link_package, LinkReport};

// Plugins implement passes against the same SWC types.
pub use deno_ast::swc;
