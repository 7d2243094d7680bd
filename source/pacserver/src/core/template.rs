//! Template loader (C3): loads named template bodies from a flat directory.
//!
//! Grounded in `original_source/internal/ProviderPACTemplates.py` and
//! `pkg/utils/listFiles.py`: non-recursive directory listing, UTF-8 reads,
//! per-file failures are warned and skipped, enumeration failure is fatal.

use std::path::Path;

use crate::core::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub body: String,
}

/// List and read every regular file directly inside `dir` (no recursion
/// into subdirectories). Failing to list the directory at all is fatal
/// (§7, `TemplatesLoadIO`); a single file that can't be read as UTF-8 is
/// warned and skipped.
pub async fn load_templates(dir: &Path) -> Result<Vec<Template>, LoadError> {
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(|source| LoadError::TemplatesIo {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut templates = Vec::new();

    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(LoadError::TemplatesIo {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let file_type = match entry.file_type().await {
            Ok(ft) => ft,
            Err(e) => {
                tracing::warn!(path = ?entry.path(), error = %e, "unable to stat template entry, skipping");
                continue;
            }
        };
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        match tokio::fs::read_to_string(entry.path()).await {
            Ok(body) => templates.push(Template { name, body }),
            Err(e) => {
                tracing::warn!(path = ?entry.path(), error = %e, "unable to read template, skipping");
            }
        }
    }

    Ok(templates)
}
