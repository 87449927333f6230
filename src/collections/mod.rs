use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

const BATCH_PREFIX: &str = "batch_";
const IMAGE_PATTERNS: [&str; 4] = ["*.jpg", "*.jpeg", "*.png", "*.webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchInfo {
    pub name: String,
    pub image_count: usize,
}

/// One batch and its image paths, each relative to the collections
/// directory (`<batch>/<file>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub name: String,
    pub image_count: usize,
    pub images: Vec<String>,
}

/// Batch names under `dir`, sorted, with their image counts.
/// A missing collections directory has no batches.
pub fn list_batches(dir: &Path) -> Result<Vec<BatchInfo>> {
    if !dir.exists() {
        debug!(path = %dir.display(), "collections directory not found");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read collections directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(BATCH_PREFIX) && entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let image_count = batch_image_files(dir, &name)?.len();
            Ok(BatchInfo { name, image_count })
        })
        .collect()
}

/// Images of one batch, or `None` when no such batch exists.
///
/// A `<batch>.json` manifest (a JSON array of paths) next to the batch
/// directory wins over scanning the directory.
pub fn batch_images(dir: &Path, name: &str) -> Result<Option<Batch>> {
    if !is_batch_name(name) || !dir.join(name).is_dir() {
        return Ok(None);
    }

    let images = batch_image_files(dir, name)?;
    Ok(Some(Batch {
        name: name.to_string(),
        image_count: images.len(),
        images,
    }))
}

fn is_batch_name(name: &str) -> bool {
    name.starts_with(BATCH_PREFIX) && !name.contains(['/', '\\'])
}

fn batch_image_files(dir: &Path, name: &str) -> Result<Vec<String>> {
    let manifest = dir.join(format!("{}.json", name));
    if manifest.is_file() {
        return read_manifest(&manifest, name);
    }
    scan_images(&dir.join(name), name)
}

fn read_manifest(path: &Path, batch: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch manifest {}", path.display()))?;
    let entries: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid batch manifest {}", path.display()))?;
    debug!(path = %path.display(), count = entries.len(), "using batch manifest");

    Ok(entries
        .into_iter()
        .map(|entry| {
            if entry.contains('/') {
                entry
            } else {
                format!("{}/{}", batch, entry)
            }
        })
        .collect())
}

fn scan_images(batch_dir: &Path, batch: &str) -> Result<Vec<String>> {
    // Brackets or stars in the directory name are literal
    let base = glob::Pattern::escape(&batch_dir.to_string_lossy());
    let mut files = Vec::new();
    for pattern in IMAGE_PATTERNS {
        let full = Path::new(&base).join(pattern);
        let full = full.to_string_lossy();
        for path in glob::glob(&full).with_context(|| format!("Invalid image pattern {}", full))? {
            // Unreadable entries are skipped
            let Ok(path) = path else { continue };
            if let Some(file_name) = path.file_name() {
                files.push(format!("{}/{}", batch, file_name.to_string_lossy()));
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let b2 = dir.path().join("batch_002");
        let b1 = dir.path().join("batch_001");
        fs::create_dir(&b1).unwrap();
        fs::create_dir(&b2).unwrap();
        fs::create_dir(dir.path().join("misc")).unwrap();
        touch(&dir.path().join("batch_file.txt"));

        touch(&b1.join("b.webp"));
        touch(&b1.join("a.jpg"));
        touch(&b1.join("c.png"));
        touch(&b1.join("notes.txt"));
        touch(&b2.join("x.jpeg"));
        dir
    }

    #[test]
    fn test_list_batches_sorted_and_counted() {
        let dir = fixture();
        let batches = list_batches(dir.path()).unwrap();
        assert_eq!(
            batches,
            vec![
                BatchInfo {
                    name: "batch_001".to_string(),
                    image_count: 3
                },
                BatchInfo {
                    name: "batch_002".to_string(),
                    image_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_missing_directory_has_no_batches() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_batches(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_batch_images_scanned_and_sorted() {
        let dir = fixture();
        let batch = batch_images(dir.path(), "batch_001").unwrap().unwrap();
        assert_eq!(
            batch.images,
            vec!["batch_001/a.jpg", "batch_001/b.webp", "batch_001/c.png"]
        );
        assert_eq!(batch.image_count, 3);
    }

    #[test]
    fn test_manifest_takes_precedence() {
        let dir = fixture();
        fs::write(
            dir.path().join("batch_002.json"),
            r#"["z.webp", "batch_002/y.webp"]"#,
        )
        .unwrap();
        let batch = batch_images(dir.path(), "batch_002").unwrap().unwrap();
        assert_eq!(batch.images, vec!["batch_002/z.webp", "batch_002/y.webp"]);
    }

    #[test]
    fn test_invalid_manifest_is_error() {
        let dir = fixture();
        fs::write(dir.path().join("batch_001.json"), "{not json").unwrap();
        assert!(batch_images(dir.path(), "batch_001").is_err());
    }

    #[test]
    fn test_glob_characters_in_directory_are_literal() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("photos [2025] *");
        let batch = dir.join("batch_001");
        fs::create_dir_all(&batch).unwrap();
        touch(&batch.join("a.jpg"));
        touch(&batch.join("b.png"));

        let found = batch_images(&dir, "batch_001").unwrap().unwrap();
        assert_eq!(found.images, vec!["batch_001/a.jpg", "batch_001/b.png"]);
        assert_eq!(
            list_batches(&dir).unwrap(),
            vec![BatchInfo {
                name: "batch_001".to_string(),
                image_count: 2
            }]
        );
    }

    #[test]
    fn test_unknown_batch_is_none() {
        let dir = fixture();
        assert!(batch_images(dir.path(), "batch_999").unwrap().is_none());
        assert!(batch_images(dir.path(), "misc").unwrap().is_none());
        assert!(batch_images(dir.path(), "batch_001/../misc").unwrap().is_none());
    }
}
