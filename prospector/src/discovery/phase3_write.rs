//! Phase 3: Write the manifest to disk
//!
//! Every file is checked before the first write, so a bad header or an
//! escaping path leaves the output directory empty. Writes then run
//! concurrently; a failed write aborts the phase and keeps whatever was
//! already written.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;
use tracing::debug;

use prospector_sdk::log_file_written;

use crate::discovery::types::{FileManifest, GeneratedFile};
use crate::error::{ProspectorError, Result};
use crate::workflow_utils::execute_concurrent;

/// Opening line of a frontmatter block
pub const FRONTMATTER_OPEN: &str = "---\n";
/// Closing line of a frontmatter block, searched for after the opener
pub const FRONTMATTER_CLOSE: &str = "\n---\n";

fn strip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid regex"))
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\s_-]+").expect("valid regex"))
}

/// Derive a filesystem-safe identifier from a display name
///
/// Lower-cases and trims, drops everything except ASCII letters, digits,
/// underscores, whitespace and hyphens, collapses separator runs into one
/// hyphen and strips hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = strip_pattern().replace_all(lowered.trim(), "");
    let hyphenated = separator_pattern().replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Check that `content` opens and later closes a frontmatter block
pub fn validate_frontmatter(content: &str, path: &str) -> Result<()> {
    if !content.starts_with(FRONTMATTER_OPEN) {
        return Err(ProspectorError::Frontmatter {
            path: path.to_string(),
            message: "is missing YAML frontmatter".to_string(),
        });
    }

    let closed = content
        .get(FRONTMATTER_OPEN.len()..)
        .is_some_and(|rest| rest.contains(FRONTMATTER_CLOSE));
    if !closed {
        return Err(ProspectorError::Frontmatter {
            path: path.to_string(),
            message: "has malformed YAML frontmatter".to_string(),
        });
    }

    Ok(())
}

/// Reject paths that would land outside the output directory
pub fn validate_relative_path(path: &str) -> Result<()> {
    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ProspectorError::UnsafePath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Resolve the output directory: the override, else `<base_dir>/<slug>`
pub fn output_dir_for(manifest: &FileManifest, out_dir: Option<&Path>, base_dir: &Path) -> PathBuf {
    out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join(&manifest.company_slug))
}

/// Write every manifest file and return the output directory
pub async fn write_files(
    manifest: &FileManifest,
    out_dir: Option<&Path>,
    base_dir: &Path,
) -> Result<PathBuf> {
    let dir = output_dir_for(manifest, out_dir, base_dir);
    println!("💾 Writing {} files to {}", manifest.files.len(), dir.display());

    fs::create_dir_all(&dir)
        .await
        .map_err(|source| ProspectorError::Io {
            path: dir.clone(),
            source,
        })?;

    for file in &manifest.files {
        validate_relative_path(&file.path)?;
        validate_frontmatter(&file.content, &file.path)?;
    }

    let files: Vec<&GeneratedFile> = manifest.files.iter().collect();
    let concurrency = files.len();
    let dir_ref = &dir;

    execute_concurrent(files, concurrency, |file, ctx| async move {
        let target = dir_ref.join(&file.path);
        let io_err = |source| ProspectorError::Io {
            path: target.clone(),
            source,
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        fs::write(&target, &file.content).await.map_err(io_err)?;

        debug!(
            path = %target.display(),
            file = ctx.task_number,
            total = ctx.total_tasks,
            "file written"
        );
        println!("   ✓ {}", file.path);
        log_file_written!(target.display(), file.content.len());
        Ok::<_, ProspectorError>(())
    })
    .await?;

    Ok(dir)
}
