//! Destinations for planned output.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The two filesystem operations the writer needs.
pub trait FileSink {
    /// Create a directory and all missing parents.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// Write a complete file, replacing any previous content.
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Writes to the local filesystem.
///
/// Files are written to a hidden temp file next to the target, synced, then
/// renamed over the target, so a crash never leaves a truncated JSON file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl FileSink for FsSink {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let temp_file = temp_path(path)?;

        {
            let mut file = File::create(&temp_file)?;
            file.write_all(contents)?;
            file.sync_all()?;
        }

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(&temp_file, path)
    }
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file path: {}", path.display()),
        )
    })?;

    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

/// Records output in memory. Used for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories created so far.
    #[must_use]
    pub fn dirs(&self) -> &BTreeSet<PathBuf> {
        &self.dirs
    }

    /// Files written so far, by path.
    #[must_use]
    pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
        &self.files
    }

    /// Content of one file as text, if it was written.
    #[must_use]
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl FileSink for MemorySink {
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        self.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fs_sink_writes_and_replaces() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("pages").join("home");
        let file = dir.join("home.json");

        let mut sink = FsSink;
        sink.create_dir_all(&dir).unwrap();
        sink.write_file(&file, b"[1]").unwrap();
        sink.write_file(&file, b"[2]").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "[2]");
        // No temp file left behind
        assert!(!dir.join(".home.json.tmp").exists());
    }

    #[test]
    fn test_fs_sink_missing_parent_fails() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("missing").join("slots.json");
        assert!(FsSink.write_file(&file, b"[]").is_err());
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("out/slots.json")).unwrap(),
            PathBuf::from("out/.slots.json.tmp")
        );
        assert!(temp_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_memory_sink_records() {
        let mut sink = MemorySink::new();
        sink.create_dir_all(Path::new("out")).unwrap();
        sink.write_file(Path::new("out/a.json"), b"[]").unwrap();

        assert!(sink.dirs().contains(Path::new("out")));
        assert_eq!(
            sink.read_to_string(Path::new("out/a.json")).as_deref(),
            Some("[]")
        );
    }
}
