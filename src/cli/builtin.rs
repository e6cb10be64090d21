//! Built-in commands and their help texts

use std::fmt::Write;

use super::app::Session;
use super::args::OptionSet;
use super::shape_cmd::{self, ShapeCommand};
use super::BIN_NAME;
use crate::error::{CliError, Result};
use crate::storage::{CommandDescriptor, CommandSource, Handler, Registry};

const USAGE: &str = "\
NURBS-CLI - Evaluate, plot and export NURBS shapes from the command line

Shapes are described in YAML, JSON or libconfig files. Input files may use
template tags: <% block %>, <{ value }> and <# comment #>.

Usage:

    nurbs {command} {arguments} {options}

Individual command help available via

    nurbs {command} --help

Common options:

    --verbose       prints diagnostic messages to stderr
    --debug         prints the full error detail on failure";

const HELP_HELP: &str = "\
HELP: Displays nurbs-cli help and the list of available commands

Usage:

    nurbs help";

const VERSION_HELP: &str = "\
VERSION: Displays the nurbs-cli version

Usage:

    nurbs version";

const PLOT_HELP: &str = "\
PLOT: Plots NURBS curves and surfaces as an SVG figure

Usage:

    nurbs plot {file}                             plots every shape defined in the file
    nurbs plot {file} --delta=0.1                 plots using the evaluation delta of 0.1
    nurbs plot {file} --index=2                   plots the shape at index 2 of a multi-shape file
    nurbs plot {file} --vis=\"ctrlpts:off\"         hides the control points

Available parameters:

    --help          displays this message
    --type=t        sets the input file type (yaml, json, cfg, conf); default: file extension
    --index=n       plots the n-th curve or surface in the file (multi shapes only, 0-based)
    --delta=d       overrides the evaluation delta in the file, 0.001 <= d < 1.0
    --name=fn       sets the figure file name (default: input file with .svg extension)
    --vis=opts      visualization options as key:on|off pairs separated by ';'
                    (keys: ctrlpts, evalpts, legend; default: legend:off)

Notes:

    - Larger delta values, e.g. 0.05 or 0.1, render faster.";

const EVAL_HELP: &str = "\
EVAL: Evaluates NURBS curves and surfaces and prints or saves the evaluated points

Points are printed to the screen by default, one point per line. For multi curves
and surfaces a \"---\" line separates the points of the individual shapes. The
points can also be saved as CSV, TXT or legacy VTK files.

Usage:

    nurbs eval {file}                                   prints the evaluated points
    nurbs eval {file} --format=csv --name=points.csv    saves the evaluated points as CSV

Available parameters:

    --help          displays this message
    --type=t        sets the input file type (yaml, json, cfg, conf); default: file extension
    --index=n       evaluates the n-th curve or surface in the file (multi shapes only, 0-based)
    --delta=d       overrides the evaluation delta in the file, 0.001 <= d < 1.0
    --format=f      output format: screen, csv, txt, vtk (default: screen)
    --name=fn       sets the output file name (default: input file with the format extension)";

const EXPORT_HELP: &str = "\
EXPORT: Exports NURBS curves and surfaces in exchange formats

Usage:

    nurbs export {file}                       exports the shape as JSON (default)
    nurbs export {file} --format=cfg          exports the shape in libconfig format

Available parameters:

    --help          displays this message
    --type=t        sets the input file type (yaml, json, cfg, conf); default: file extension
    --index=n       exports the n-th curve or surface in the file (multi shapes only, 0-based)
    --delta=d       overrides the evaluation delta in the file, 0.001 <= d < 1.0
    --format=f      export format: cfg, json, yaml, obj, stl, off, smesh (default: json)
    --name=fn       sets the export file name (default: input file with the format extension)

Notes:

    - obj, stl, off and smesh support surfaces only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    Help,
    Version,
    Plot,
    Eval,
    Export,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 5] = [
        BuiltinCommand::Help,
        BuiltinCommand::Version,
        BuiltinCommand::Plot,
        BuiltinCommand::Eval,
        BuiltinCommand::Export,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCommand::Help => "help",
            BuiltinCommand::Version => "version",
            BuiltinCommand::Plot => "plot",
            BuiltinCommand::Eval => "eval",
            BuiltinCommand::Export => "export",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinCommand::Help => "displays this message",
            BuiltinCommand::Version => "displays the package version",
            BuiltinCommand::Plot => "plots single or multiple NURBS curves and surfaces as SVG",
            BuiltinCommand::Eval => "evaluates NURBS shapes and prints or saves the evaluated points",
            BuiltinCommand::Export => "exports NURBS shapes in exchange formats",
        }
    }

    /// Required positional arguments
    pub fn arity(&self) -> usize {
        match self {
            BuiltinCommand::Help | BuiltinCommand::Version => 0,
            BuiltinCommand::Plot | BuiltinCommand::Eval | BuiltinCommand::Export => 1,
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            BuiltinCommand::Help => HELP_HELP,
            BuiltinCommand::Version => VERSION_HELP,
            BuiltinCommand::Plot => PLOT_HELP,
            BuiltinCommand::Eval => EVAL_HELP,
            BuiltinCommand::Export => EXPORT_HELP,
        }
    }

    pub fn descriptor(&self) -> CommandDescriptor {
        CommandDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            help: None,
            arity: self.arity(),
            source: CommandSource::BuiltIn,
            handler: Handler::Builtin(*self),
        }
    }

    pub fn run(&self, session: &Session<'_>, args: &[String], options: &OptionSet) -> Result<()> {
        match self {
            BuiltinCommand::Help => {
                session.output.success(&usage(session.config.registry()));
                Ok(())
            }
            BuiltinCommand::Version => {
                session
                    .output
                    .success(&format!("{}-cli version {}", BIN_NAME, env!("CARGO_PKG_VERSION")));
                Ok(())
            }
            BuiltinCommand::Plot => self.run_shape(ShapeCommand::Plot, session, args, options),
            BuiltinCommand::Eval => self.run_shape(ShapeCommand::Eval, session, args, options),
            BuiltinCommand::Export => self.run_shape(ShapeCommand::Export, session, args, options),
        }
    }

    fn run_shape(
        &self,
        command: ShapeCommand,
        session: &Session<'_>,
        args: &[String],
        options: &OptionSet,
    ) -> Result<()> {
        let file = args.first().ok_or_else(|| CliError::ArgumentArity {
            command: self.name().to_string(),
            expected: self.arity(),
            got: args.len(),
        })?;
        shape_cmd::run(command, session, file, options)
    }
}

/// Top-level help: usage plus every registered command
pub fn usage(registry: &Registry) -> String {
    let width = registry.iter().map(|c| c.name.len()).max().unwrap_or(0).max(8);

    let mut text = String::from(USAGE);
    text.push_str("\n\nAvailable commands:\n\n");
    for cmd in registry.iter() {
        let _ = write!(text, "    {:width$}    {}", cmd.name, cmd.description, width = width);
        if let CommandSource::User(path) = &cmd.source {
            let _ = write!(text, " ({})", path.display());
        }
        text.push('\n');
    }
    text
}
