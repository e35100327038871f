//! Translator from the stack-based VM language to Hack assembly.
//!
//! Data flows one way: [`scanner`] turns source text into [`ast::Command`]s,
//! [`translator`] maps each command onto instruction sequences built by
//! [`fragment`], and [`driver`] strings files together into one output.

macro_rules! svec {
    ($($x:expr),* $(,)?) => (vec![$($x.to_string()),*]);
}

pub mod log;

pub mod ast;
pub mod driver;
pub mod error;
pub mod fragment;
pub mod register;
pub mod scanner;
pub mod translator;

pub use error::{Error, GenerationError, Result, ScanError, ScanErrorKind};
pub use translator::Translator;

/// Translate one source file. `file` is its logical name (the file stem),
/// which namespaces the `static` segment and generated labels.
pub fn translate_source(file: &str, source: &str) -> Result<Vec<String>> {
    let commands = scanner::scan(source).map_err(|source| Error::Scan {
        file: file.to_string(),
        source,
    })?;
    Translator::new(file)
        .translate_all(&commands)
        .map_err(|source| Error::Generation {
            file: file.to_string(),
            source,
        })
}
