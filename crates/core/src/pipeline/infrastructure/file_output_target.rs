use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::pipeline::output_target::{OutputError, OutputTarget};

/// Transcript file written through a `.part` sibling.
///
/// Chunks are appended to `<output>.part` while the run progresses; the
/// final transcript is written there too and then renamed onto `<output>`.
/// The final path therefore only ever holds a finished transcript.
///
/// A transcript with skipped segments is still written to `<output>`, but
/// an `<output>.partial` marker next to it keeps `is_complete` false so a
/// later run tries again.
pub struct FileOutputTarget {
    path: PathBuf,
    part_path: PathBuf,
    marker_path: PathBuf,
    part: Option<File>,
}

impl FileOutputTarget {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            part_path: sibling(path, ".part"),
            marker_path: sibling(path, ".partial"),
            part: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn part_path(&self) -> &Path {
        &self.part_path
    }

    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    fn io_err(&self, path: &Path) -> impl Fn(std::io::Error) -> OutputError {
        let path = path.to_path_buf();
        move |source| OutputError {
            path: path.clone(),
            source,
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

impl OutputTarget for FileOutputTarget {
    fn is_complete(&self) -> bool {
        let written = fs::metadata(&self.path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false);
        written && !self.marker_path.exists()
    }

    fn begin(&mut self) -> Result<(), OutputError> {
        if let Some(parent) = self.part_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(self.io_err(parent))?;
            }
        }
        let file = File::create(&self.part_path).map_err(self.io_err(&self.part_path))?;
        self.part = Some(file);
        Ok(())
    }

    fn append(&mut self, chunk: &str) -> Result<(), OutputError> {
        let err = self.io_err(&self.part_path);
        let file = match self.part.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.part_path)
                .map_err(&err)?,
        };
        let file = self.part.insert(file);
        file.write_all(chunk.as_bytes()).map_err(&err)?;
        file.flush().map_err(&err)
    }

    fn commit(&mut self, contents: &str, complete: bool) -> Result<(), OutputError> {
        // Close the append handle before rewriting and renaming.
        self.part = None;
        fs::write(&self.part_path, contents).map_err(self.io_err(&self.part_path))?;

        // Marker goes down before the rename and comes off after it, so an
        // interrupted commit never reads as complete.
        if !complete {
            fs::write(&self.marker_path, "").map_err(self.io_err(&self.marker_path))?;
        }
        fs::rename(&self.part_path, &self.path).map_err(self.io_err(&self.path))?;
        if complete && self.marker_path.exists() {
            fs::remove_file(&self.marker_path).map_err(self.io_err(&self.marker_path))?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
