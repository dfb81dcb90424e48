//! Index file reader/writer

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{Result, TextBookError};
use crate::format::{self, PostId};

/// Handle on the index file
///
/// Holds no open file descriptor; each operation opens, writes and closes.
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
    sync_strategy: SyncStrategy,
}

impl IndexFile {
    pub fn new(path: impl Into<PathBuf>, sync_strategy: SyncStrategy) -> Self {
        Self {
            path: path.into(),
            sync_strategy,
        }
    }

    /// Read ids in file order
    ///
    /// Returns:
    /// - `Ok(None)` — no index file yet (fresh store)
    /// - `Ok(Some(ids))` — ids in the order posts were added, blank lines skipped
    /// - `Err(RecoveryFailure)` — a line is not a positive id, or an id repeats
    pub fn read_ids(&self) -> Result<Option<Vec<PostId>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut ids: Vec<PostId> = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let id = format::parse_id(line).map_err(|e| {
                TextBookError::recovery(
                    None,
                    format!("{} line {}: {}", self.path.display(), line_no + 1, e),
                )
            })?;
            if ids.contains(&id) {
                return Err(TextBookError::recovery(
                    Some(id),
                    format!("{} lists the id more than once", self.path.display()),
                ));
            }
            ids.push(id);
        }

        Ok(Some(ids))
    }

    /// Append one id, creating the file on first use
    ///
    /// A last line left without its newline is terminated first, so the new
    /// id never runs into the previous one.
    pub fn append(&self, id: PostId) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let line = if Self::ends_unterminated(&mut file)? {
            format!("\n{}\n", id)
        } else {
            format!("{}\n", id)
        };
        file.write_all(line.as_bytes())?;
        self.sync(&file)
    }

    /// Replace the contents with `ids`
    ///
    /// Writes a temporary sibling, syncs it, then renames it over the index.
    pub fn rewrite(&self, ids: &[PostId]) -> Result<()> {
        let tmp_path = self.tmp_path();

        let result = (|| -> Result<()> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for id in ids {
                writeln!(writer, "{}", id)?;
            }
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            self.sync(&file)?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the file is non-empty and its last byte is not `\n`
    fn ends_unterminated(file: &mut File) -> Result<bool> {
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(false);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn sync(&self, file: &File) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}
