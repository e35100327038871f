use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use vm_translator::driver::{self, Bootstrap, Options};
use vm_translator::log::{self, Level};

#[derive(Parser)]
#[command(name = "vmtranslator")]
#[command(about = "Translate VM code into Hack assembly")]
struct Args {
    /// A .vm file, or a directory whose .vm files form one program
    input: PathBuf,

    /// Output file (defaults to <name>.asm next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// When to prepend code that sets up the stack and calls Sys.init
    #[arg(long, value_enum, default_value_t = BootstrapOpt::Auto)]
    bootstrap: BootstrapOpt,

    /// Also print debug messages
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BootstrapOpt {
    /// Only if Sys.vm is among the inputs
    Auto,
    Always,
    Never,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.verbose {
        log::set_level(Level::Debug);
    } else if args.quiet {
        log::set_level(Level::Error);
    }

    let options = Options {
        input: args.input,
        output: args.output,
        bootstrap: match args.bootstrap {
            BootstrapOpt::Auto => Bootstrap::Auto,
            BootstrapOpt::Always => Bootstrap::Always,
            BootstrapOpt::Never => Bootstrap::Never,
        },
    };

    match driver::run(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            vm_translator::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
