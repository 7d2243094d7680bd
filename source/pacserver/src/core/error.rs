use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load entirely (§7: `ZonesLoadIO`, `TemplatesLoadIO`).
/// Per-record problems (malformed CSV lines, unreadable template files) are
/// never represented here — they are warned and skipped at the call site.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open zone file at {path}")]
    ZonesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list template directory at {path}")]
    TemplatesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
