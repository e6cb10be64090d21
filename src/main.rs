//! nurbs - evaluate, plot and export NURBS shapes

use std::process::ExitCode;

fn main() -> ExitCode {
    nurbs_cli::cli::run(std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()))
}
