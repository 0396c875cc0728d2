use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed to write {path}: {source}")]
pub struct OutputError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Where the assembled transcript goes.
///
/// Single writer. Chunks are appended as segments finish, then the final
/// renumbered transcript replaces them in one `commit`.
pub trait OutputTarget: Send {
    /// True if a transcript covering every segment is already in place.
    /// Partial transcripts don't count.
    fn is_complete(&self) -> bool;

    /// Start from an empty target, discarding leftovers of an earlier run.
    fn begin(&mut self) -> Result<(), OutputError>;

    fn append(&mut self, chunk: &str) -> Result<(), OutputError>;

    /// Replace everything appended so far with `contents`. With
    /// `complete == false` the transcript is kept but stays eligible for a
    /// re-run.
    fn commit(&mut self, contents: &str, complete: bool) -> Result<(), OutputError>;

    fn describe(&self) -> String;
}
