use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::Result;

/// Last-seen notification count, stored as decimal text in a single file.
///
/// No locking and no atomic replace: concurrent runs against the same file must
/// be serialized by whoever schedules them.
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previously stored count, or 0 if the file is missing or unreadable.
    pub fn load(&self) -> u64 {
        let txt = match fs::read_to_string(&self.path) {
            Ok(txt) => txt,
            Err(e) => {
                debug!(
                    "Error reading {}, falling back to 0: {e}",
                    self.path.display()
                );
                return 0;
            }
        };

        // Lenient about surrounding whitespace, e.g. a hand-edited file with a
        // trailing newline.
        match txt.trim().parse::<u64>() {
            Ok(n) => n,
            Err(e) => {
                debug!(
                    "Error parsing {} ({txt:?}), falling back to 0: {e}",
                    self.path.display()
                );
                0
            }
        }
    }

    /// Overwrite the stored count.
    pub fn save(&self, count: u64) -> Result<()> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o700);
        }

        let mut file = opts.open(&self.path)?;
        file.write_all(count.to_string().as_bytes())?;
        Ok(())
    }
}
