//! Letter output.
//!
//! Each attendee gets `<output_dir>/thanks_<id>.html`. The directory is
//! created on the first save; existing letters with the same id are
//! overwritten, so re-running a batch is idempotent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LetterWriter {
    dir: PathBuf,
}

impl LetterWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LetterWriter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("thanks_{}.html", id))
    }

    /// Write one letter, terminated by a single newline.
    ///
    /// Ids that would place the file outside the output directory (path
    /// separators, `..`) or produce a nameless file are rejected with
    /// `InvalidInput`.
    pub fn save(&self, id: &str, letter: &str) -> io::Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("attendee id {:?} cannot be used as a file name", id),
            ));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(id);

        let mut contents = letter.to_string();
        if !contents.ends_with('\n') {
            contents.push('\n');
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
