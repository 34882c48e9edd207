//! Default injectable processor: decrypt, resolve, merge, write.

use crate::crypto::{codec, signature};
use crate::inject::registry::InjectableProcessor;
use crate::protocol::models::{InjectMode, Injectable};
use crate::DevpayrError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Default processor that writes decrypted injectables to disk.
///
/// Resolves the target strictly under the base path: leading separators on
/// the server-supplied path are stripped, and `..` segments that would
/// escape the base directory are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectionEngine {
    strict: bool,
}

impl InjectionEngine {
    /// Create an engine. In strict mode, an injectable without a
    /// `target_path` is rejected; in lenient mode it falls back to
    /// `<slug>.txt` under the base path.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether this engine requires a `target_path` on every injectable.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl InjectableProcessor for InjectionEngine {
    fn handle(
        &self,
        injectable: &Injectable,
        secret: &str,
        base_path: &Path,
        verify: bool,
    ) -> Result<PathBuf, DevpayrError> {
        injectable.require_fields()?;
        if self.strict && injectable.target_path.as_deref().map_or(true, str::is_empty) {
            return Err(DevpayrError::InvalidInjectable {
                slug: injectable.slug.clone(),
                reason: "missing 'target_path'".to_string(),
            });
        }

        let encrypted = injectable.content()?;

        // Integrity is advisory-by-configuration: checked only when the
        // caller enables it AND the payload carries a signature.
        if verify {
            if let Some(sig) = injectable.signature.as_deref() {
                if !signature::verify(encrypted.as_bytes(), secret, sig) {
                    return Err(DevpayrError::SignatureError {
                        slug: injectable.slug.clone(),
                    });
                }
            }
        }

        let plaintext = codec::decrypt(encrypted, secret)?;
        let full_path = resolve_target(base_path, injectable)?;
        ensure_parent_dir(&full_path)?;

        let merged = if full_path.exists() {
            let existing = fs::read(&full_path).map_err(|e| DevpayrError::Io {
                path: full_path.display().to_string(),
                message: format!("Failed to read existing file: {e}"),
            })?;
            merge(existing, plaintext, injectable.mode)
        } else {
            // First write is always a full write, regardless of mode.
            plaintext
        };

        write_atomic(&full_path, &merged)?;

        debug!(
            slug = %injectable.slug,
            path = %full_path.display(),
            mode = ?injectable.mode,
            "wrote injectable"
        );

        Ok(full_path)
    }
}

/// Combine existing file bytes with the decrypted payload per mode.
fn merge(existing: Vec<u8>, new: Vec<u8>, mode: InjectMode) -> Vec<u8> {
    match mode {
        InjectMode::Append => {
            let mut merged = existing;
            merged.extend_from_slice(&new);
            merged
        }
        InjectMode::Prepend => {
            let mut merged = new;
            merged.extend_from_slice(&existing);
            merged
        }
        // Replace, plus the reserved inject mode and anything unknown.
        InjectMode::Replace | InjectMode::Inject => new,
    }
}

/// Resolve the full target path under the base directory.
///
/// Normalizes `.`/`..` components; a path that is absolute or would step
/// above the base directory is rejected.
fn resolve_target(base_path: &Path, injectable: &Injectable) -> Result<PathBuf, DevpayrError> {
    let is_sep = |c: char| c == '/' || c == '\\';
    let raw = match injectable.target_path.as_deref() {
        Some(p) if !p.trim_matches(is_sep).is_empty() => p.trim_matches(is_sep).to_string(),
        _ => format!("{}.txt", injectable.slug),
    };

    let mut clean = PathBuf::new();
    let mut depth: usize = 0;
    for component in Path::new(&raw).components() {
        match component {
            Component::Normal(part) => {
                depth += 1;
                clean.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(DevpayrError::PathTraversal { path: raw });
                }
                depth -= 1;
                clean.pop();
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(DevpayrError::PathTraversal { path: raw });
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(DevpayrError::InvalidInjectable {
            slug: injectable.slug.clone(),
            reason: format!("target_path '{raw}' resolves to nothing"),
        });
    }

    Ok(base_path.join(clean))
}

/// Create the parent directory recursively.
///
/// A creation race is not a failure as long as the directory exists
/// afterwards.
fn ensure_parent_dir(path: &Path) -> Result<(), DevpayrError> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if let Err(e) = fs::create_dir_all(dir) {
        if !dir.is_dir() {
            return Err(DevpayrError::Io {
                path: dir.display().to_string(),
                message: format!("Failed to create directory: {e}"),
            });
        }
    }
    Ok(())
}

/// Write via temp file + rename so an interrupted write never leaves a
/// half-merged target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DevpayrError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&temp_path, bytes).map_err(|e| DevpayrError::Io {
        path: temp_path.display().to_string(),
        message: format!("Failed to write temp file: {e}"),
    })?;

    fs::rename(&temp_path, path).map_err(|e| DevpayrError::Io {
        path: path.display().to_string(),
        message: format!("Failed to write injectable: {e}"),
    })
}
