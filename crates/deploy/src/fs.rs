//! File system utils.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use fs2::FileExt;

pub struct FsHandler;

impl FsHandler {
    /// Create a directory and its parents if they don't exist.
    pub fn create_dir(path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)?;
        tracing::debug!("Ensured directory exists: {}", path.display());
        Ok(())
    }

    /// Replace the content of `path` in one step.
    ///
    /// Readers see either the previous file or the new one, never a partial write.
    /// The temporary file name is fixed, so concurrent writers of the same
    /// `path` must hold its lock (see [`FsHandler::lock_exclusive`]).
    pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
        let temp_path = Self::temp_path(path);

        if let Err(e) = std::fs::write(&temp_path, contents) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }

        std::fs::rename(&temp_path, path).inspect_err(|_| {
            let _ = std::fs::remove_file(&temp_path);
        })
    }

    /// Take an exclusive advisory lock on `lock_path`, blocking until it is free.
    ///
    /// The lock is released when the returned file is dropped.
    pub fn lock_exclusive(lock_path: &Path) -> io::Result<File> {
        let lock_file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(lock_path)?;

        FileExt::lock_exclusive(&lock_file)?;
        tracing::trace!("Acquired lock: {}", lock_path.display());

        Ok(lock_file)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }
}
