//! FileStagingLog - staging log on a local fast filesystem (tmpfs, RAM disk)

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use contracts::{LoggerError, StagingLog, StorageOp};
use tracing::{debug, instrument};

/// File-backed staging log
///
/// The file is created empty on open; appends go to the end of the file and
/// reads follow a separate cursor.
#[derive(Debug)]
pub struct FileStagingLog {
    path: PathBuf,
    file: File,
    cursor: u64,
    len: u64,
    capacity: u64,
}

impl FileStagingLog {
    /// Create (or truncate) the staging file at `path`
    pub fn create(path: impl AsRef<Path>, capacity: usize) -> Result<Self, LoggerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error(StorageOp::Open))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(io_error(StorageOp::Open))?;

        debug!(path = %path.display(), capacity, "staging file created");

        Ok(Self {
            path,
            file,
            cursor: 0,
            len: 0,
            capacity: capacity as u64,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StagingLog for FileStagingLog {
    fn append(&mut self, bytes: &[u8]) -> Result<usize, LoggerError> {
        let room = self.capacity.saturating_sub(self.len) as usize;
        let n = room.min(bytes.len());
        if n == 0 {
            return Ok(0);
        }

        self.file
            .seek(SeekFrom::Start(self.len))
            .map_err(io_error(StorageOp::Append))?;
        self.file
            .write_all(&bytes[..n])
            .map_err(io_error(StorageOp::Append))?;
        self.len += n as u64;
        Ok(n)
    }

    fn rewind(&mut self) -> Result<(), LoggerError> {
        self.cursor = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        self.file
            .seek(SeekFrom::Start(self.cursor))
            .map_err(io_error(StorageOp::Read))?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(StorageOp::Read)(e)),
            }
        }

        self.cursor += filled as u64;
        Ok(filled)
    }

    #[instrument(name = "file_staging_truncate", skip(self), fields(path = %self.path.display()))]
    fn truncate(&mut self) -> Result<(), LoggerError> {
        self.file
            .set_len(self.cursor)
            .map_err(io_error(StorageOp::Truncate))?;
        self.len = self.cursor;
        Ok(())
    }

    fn len(&self) -> usize {
        self.len as usize
    }
}

fn io_error(op: StorageOp) -> impl Fn(io::Error) -> LoggerError {
    move |e| LoggerError::storage(op, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_log_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut log = FileStagingLog::create(&path, 1024).unwrap();

        log.append(&[1, 2, 3, 4, 5, 6]).unwrap();
        log.append(&[7, 8, 9, 10, 11, 12]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), (1..=12).collect::<Vec<u8>>());

        log.rewind().unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(log.read(&mut buf).unwrap(), 8);
        assert_eq!(log.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[9, 10, 11, 12]);
    }

    #[test]
    fn test_truncate_after_rewind_empties_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut log = FileStagingLog::create(&path, 1024).unwrap();

        log.append(&[9; 18]).unwrap();
        log.rewind().unwrap();
        log.truncate().unwrap();
        assert!(log.is_empty());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);

        log.append(&[1; 6]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![1; 6]);
    }

    #[test]
    fn test_create_discards_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, [0xFF; 30]).unwrap();

        let log = FileStagingLog::create(&path, 1024).unwrap();
        assert!(log.is_empty());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_append_respects_capacity() {
        let dir = tempdir().unwrap();
        let mut log = FileStagingLog::create(dir.path().join("data.txt"), 10).unwrap();
        assert_eq!(log.append(&[0; 6]).unwrap(), 6);
        assert_eq!(log.append(&[0; 6]).unwrap(), 4);
        assert_eq!(log.len(), 10);
    }
}
