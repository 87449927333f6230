use super::types::ReviewState;
use anyhow::{bail, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read the review state at `path`.
///
/// A missing or empty file is a fresh state. Files from another format
/// version are refused rather than rewritten. Paths that a hand edit left
/// both completed and flagged keep only their latest decision.
pub fn load_review_state(path: &Path) -> Result<ReviewState> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no review state yet");
            return Ok(ReviewState::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read review state at {}", path.display()))
        }
    };

    if content.trim().is_empty() {
        return Ok(ReviewState::new());
    }

    let mut state: ReviewState = serde_json::from_str(&content)
        .with_context(|| format!("Failed to load review state from {}", path.display()))?;

    if state.version != ReviewState::VERSION {
        bail!(
            "Unsupported review state version {} in {} (expected {})",
            state.version,
            path.display(),
            ReviewState::VERSION
        );
    }

    for file_path in state.conflicts() {
        warn!(path = %file_path, "both completed and flagged in review state, keeping the latest");
        state.resolve(&file_path);
    }

    Ok(state)
}

/// Write the review state atomically, creating the parent directory when
/// needed. The state is always written at the current format version.
pub fn save_review_state(path: &Path, state: &ReviewState) -> Result<()> {
    if state.version != ReviewState::VERSION {
        bail!("Refusing to write review state version {}", state.version);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize review state")?;
    file.commit()
        .with_context(|| format!("Failed to save review state to {}", path.display()))?;

    debug!(
        path = %path.display(),
        completed = state.completed.len(),
        flagged = state.flagged.len(),
        "saved review state"
    );
    Ok(())
}
