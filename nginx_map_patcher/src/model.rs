use thiserror::Error;

/// A `map` block dropped by the scanner. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub header: String,
    /// false when the braces never balanced and the block ran to end of input
    pub terminated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Fail on an unterminated `map` block instead of dropping the rest of the file.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub text: String,
    pub removed: Vec<RemovedBlock>,
    /// Line of the `http {` directive the map block was placed under.
    pub inserted_after_line: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("could not find 'http {{' block")]
    MissingHttpBlock,
    #[error("map block starting at line {line} is never closed")]
    UnterminatedMapBlock { line: usize },
}
