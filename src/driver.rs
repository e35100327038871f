//! Program-level glue: collecting input files, deciding on bootstrap code and
//! streaming the translation of every file into one output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::translator::{self, Translator};
use crate::{debug, info, scanner, warn};

/// File stem of the module holding the program entry point.
pub const ENTRY_MODULE: &str = "Sys";

/// Function the bootstrap code calls.
pub const ENTRY_FUNCTION: &str = "Sys.init";

const SOURCE_EXTENSION: &str = "vm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bootstrap {
    /// Only when the entry module is among the inputs.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// A source file or a directory of source files.
    pub input: PathBuf,
    /// Defaults to [`default_output`].
    pub output: Option<PathBuf>,
    pub bootstrap: Bootstrap,
}

impl Options {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Options {
            input: input.into(),
            output: None,
            bootstrap: Bootstrap::default(),
        }
    }
}

/// One input file: its logical name (the file stem) and its text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(SourceFile::new(stem(path), text))
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_source(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// A file input is taken as is; a directory yields the source files directly
/// inside it, sorted by name.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut paths = vec![];
    for entry in fs::read_dir(input).map_err(|e| Error::io(input, e))? {
        let path = entry.map_err(|e| Error::io(input, e))?.path();
        if is_source(&path) {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(Error::NoInputs(input.to_path_buf()));
    }
    paths.sort();
    Ok(paths)
}

/// `Foo.vm` becomes `Foo.asm` beside it; a directory `Prog` gets
/// `Prog/Prog.asm`.
pub fn default_output(input: &Path) -> PathBuf {
    if input.is_dir() {
        let mut name = input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .unwrap_or_else(|| "out".into());
        name.push(".asm");
        input.join(name)
    } else {
        input.with_extension("asm")
    }
}

pub fn wants_bootstrap(mode: Bootstrap, files: &[SourceFile]) -> bool {
    match mode {
        Bootstrap::Auto => files.iter().any(|f| f.name == ENTRY_MODULE),
        Bootstrap::Always => true,
        Bootstrap::Never => false,
    }
}

/// Translate `files` in order into `out`, one line at a time. On error,
/// whatever was already written stays written.
pub fn translate_program<W: Write>(
    out: &mut W,
    files: &[SourceFile],
    bootstrap: bool,
) -> Result<usize> {
    if bootstrap {
        for line in translator::bootstrap(ENTRY_FUNCTION) {
            writeln!(out, "{}", line)?;
        }
    }

    let mut translated = 0;
    for file in files {
        let commands = scanner::scan(&file.text).map_err(|source| Error::Scan {
            file: file.name.clone(),
            source,
        })?;
        debug!("{}: {} commands", file.name, commands.len());

        let translator = Translator::new(&file.name);
        for command in &commands {
            let lines = translator
                .translate(command)
                .map_err(|source| Error::Generation {
                    file: file.name.clone(),
                    source,
                })?;
            for line in lines {
                writeln!(out, "{}", line)?;
            }
        }
        translated += commands.len();
    }
    Ok(translated)
}

/// Run a whole translation as configured, returning the output path.
pub fn run(options: &Options) -> Result<PathBuf> {
    let files = collect_inputs(&options.input)?
        .iter()
        .map(|path| SourceFile::read(path))
        .collect::<Result<Vec<_>>>()?;

    let bootstrap = wants_bootstrap(options.bootstrap, &files);
    if bootstrap && !files.iter().any(|f| f.name == ENTRY_MODULE) {
        warn!("emitting bootstrap, but no {}.{} among the inputs", ENTRY_MODULE, SOURCE_EXTENSION);
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output(&options.input));
    info!(
        "translating {} file(s) into {}{}",
        files.len(),
        output.display(),
        if bootstrap { " with bootstrap" } else { "" }
    );

    let file = File::create(&output).map_err(|e| Error::io(&output, e))?;
    let mut out = BufWriter::new(file);
    let count = translate_program(&mut out, &files, bootstrap).map_err(|e| match e {
        Error::Write(source) => Error::io(&output, source),
        other => other,
    })?;
    out.flush().map_err(|e| Error::io(&output, e))?;

    debug!("{} commands translated", count);
    Ok(output)
}
