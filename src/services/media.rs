use anyhow::{bail, Result};
use std::path::{Component, Path};
use uuid::Uuid;

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Project images live under this directory inside the upload dir.
pub const PROJECT_IMAGE_DIR: &str = "projects";

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Writes an uploaded project image and returns its path relative to
/// `upload_dir` (e.g. `projects/<uuid>.png`), which is what posts store.
pub fn store_project_image(upload_dir: &Path, original_name: &str, data: &[u8]) -> Result<String> {
    if data.is_empty() {
        bail!("Image '{}' is empty", original_name);
    }

    if data.len() > MAX_FILE_SIZE {
        bail!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            MAX_FILE_SIZE
        );
    }

    let mime = mime_guess::from_path(original_name).first_or_octet_stream();
    if !ALLOWED_MIME_TYPES.contains(&mime.essence_str()) {
        bail!(
            "File type not allowed: {}. Allowed types: {}",
            mime.essence_str(),
            ALLOWED_MIME_TYPES.join(", ")
        );
    }

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let filename = if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), extension)
    };

    let dir = upload_dir.join(PROJECT_IMAGE_DIR);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(&filename), data)?;

    tracing::info!("Stored project image {} ({} bytes)", filename, data.len());
    Ok(format!("{}/{}", PROJECT_IMAGE_DIR, filename))
}

pub fn import_project_image(upload_dir: &Path, source: &Path) -> Result<String> {
    let data = std::fs::read(source)
        .map_err(|e| anyhow::anyhow!("Could not read image '{}': {}", source.display(), e))?;
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    store_project_image(upload_dir, name, &data)
}

/// Removes a stored image. Missing files are not an error.
pub fn remove_project_image(upload_dir: &Path, relative: &str) -> Result<()> {
    let relative = Path::new(relative);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("Refusing to remove '{}'", relative.display());
    }

    match std::fs::remove_file(upload_dir.join(relative)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_project_image() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store_project_image(dir.path(), "Screenshot.PNG", b"\x89PNG").unwrap();

        assert!(stored.starts_with("projects/"));
        assert!(stored.ends_with(".png"));
        assert!(dir.path().join(&stored).exists());
    }

    #[test]
    fn test_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_project_image(dir.path(), "notes.pdf", b"%PDF").is_err());
        assert!(store_project_image(dir.path(), "script.sh", b"#!/bin/sh").is_err());
    }

    #[test]
    fn test_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_project_image(dir.path(), "empty.png", b"").is_err());
    }

    #[test]
    fn test_remove_project_image() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store_project_image(dir.path(), "a.jpg", b"jpeg").unwrap();

        remove_project_image(dir.path(), &stored).unwrap();
        assert!(!dir.path().join(&stored).exists());
        // Second removal is a no-op.
        remove_project_image(dir.path(), &stored).unwrap();
    }

    #[test]
    fn test_remove_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_project_image(dir.path(), "../folio.toml").is_err());
    }
}
