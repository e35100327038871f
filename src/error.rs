use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Lexical failure, positioned at the offending character.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("syntax error at {line}:{column}: {kind}")]
pub struct ScanError {
    pub line: usize,
    pub column: usize,
    pub kind: ScanErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanErrorKind {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("expected {expected}, found {found}")]
    UnexpectedInput {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected {0} before end of line")]
    TrailingContent(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("line {line}: unknown segment '{segment}'")]
    UnknownSegment { segment: String, line: usize },
    #[error("line {line}: unknown arithmetic command '{mnemonic}'")]
    UnknownArithmetic { mnemonic: String, line: usize },
    #[error("line {line}: invalid index {index} for segment {segment}")]
    InvalidIndex {
        segment: &'static str,
        index: String,
        line: usize,
    },
    #[error("line {line}: cannot pop into the constant segment")]
    PopConstant { line: usize },
    #[error("line {line}: '{keyword}' is missing an operand")]
    MissingOperand { keyword: String, line: usize },
}

/// Everything a translation run can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{file}: {source}")]
    Scan {
        file: String,
        #[source]
        source: ScanError,
    },
    #[error("{file}: {source}")]
    Generation {
        file: String,
        #[source]
        source: GenerationError,
    },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
    #[error("no .vm files found in {}", .0.display())]
    NoInputs(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
