//! Crash-safe whole-file replacement.
//!
//! A write goes to a uniquely named temp file next to the target, is flushed
//! with `sync_all`, and is then renamed over the target. Readers see either
//! the old document or the new one, never a torn write. A crash before the
//! rename leaves a stray temp file and the committed document untouched.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A fully written and flushed temp file awaiting [`commit`](Self::commit).
#[derive(Debug)]
pub struct StagedWrite {
    temp: PathBuf,
    target: PathBuf,
}

impl StagedWrite {
    /// Write `bytes` to a fresh temp file in the target's directory.
    pub fn stage(target: &Path, bytes: &[u8]) -> io::Result<Self> {
        let dir = parent_dir(target);
        fs::create_dir_all(dir)?;
        let name = target
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let temp = dir.join(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()));
        write_and_sync(&temp, bytes)?;
        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Atomically replace the target and make the rename durable. A failed
    /// rename removes the temp file.
    pub fn commit(self) -> io::Result<()> {
        if let Err(err) = fs::rename(&self.temp, &self.target) {
            let _ = fs::remove_file(&self.temp);
            return Err(err);
        }
        sync_dir(parent_dir(&self.target))
    }

    /// Remove the temp file without touching the target.
    pub fn discard(self) -> io::Result<()> {
        fs::remove_file(&self.temp)
    }
}

/// Stage and commit in one step.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    StagedWrite::stage(target, bytes)?.commit()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

// Directory handles cannot be fsynced on every platform.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("projects.json");
        write_atomic(&target, b"[1]").unwrap();
        write_atomic(&target, b"[1,2]").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"[1,2]");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn uncommitted_stage_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("projects.json");
        write_atomic(&target, b"committed").unwrap();

        let staged = StagedWrite::stage(&target, b"half-finished").unwrap();
        assert!(staged.temp_path().exists());
        assert_eq!(fs::read(&target).unwrap(), b"committed");

        staged.discard().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"committed");
    }

    #[test]
    fn temp_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("team.json");
        let a = StagedWrite::stage(&target, b"a").unwrap();
        let b = StagedWrite::stage(&target, b"b").unwrap();
        assert_ne!(a.temp_path(), b.temp_path());
        b.commit().unwrap();
        a.commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"a");
    }
}
