use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Bundle discovery failed: {0}")]
    Discovery(String),

    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse `{}`: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to emit linked code for `{}`: {message}", .path.display())]
    Emit { path: PathBuf, message: String },

    #[error("No `exports` in `{}`. Cannot link Angular code", .path.display())]
    MissingExports { path: PathBuf },

    #[error("Unsupported `exports` shape in `{}`: expected an object of subpaths", .path.display())]
    UnsupportedExports { path: PathBuf },

    #[error("Invalid JSON in `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} of {total} link task(s) failed:\n{}", .errors.len(), format_task_errors(.errors))]
    Tasks {
        total: usize,
        errors: Vec<LinkError>,
    },
}

impl LinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LinkError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_task_errors(errors: &[LinkError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, LinkError>;
