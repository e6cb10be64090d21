//! Shape commands: plot, eval, export
//!
//! All three share one pipeline:
//!
//! 1. validate the output format and destination
//! 2. render the input file template
//! 3. stage the rendered text in a temporary file with the same extension
//! 4. parse the staged file and extract the `shape` section
//! 5. resolve single vs. collection with the index/delta overrides
//! 6. write the result
//!
//! Nothing is read or written before step 1 succeeds, and the staged file is
//! removed on every exit path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::app::Session;
use super::args::OptionSet;
use crate::domain::resolve;
use crate::error::{CliError, Result};
use crate::exchange::{ExportRequest, Format, InputType, ShapeDocument};
use crate::render::{self, VisOptions};
use crate::storage::StagedFile;
use crate::template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeCommand {
    Plot,
    Eval,
    Export,
}

/// Where the resolved shape goes
#[derive(Debug)]
enum Target {
    Figure { vis: VisOptions, destination: PathBuf },
    Exchange(ExportRequest),
}

impl Target {
    fn new(command: ShapeCommand, session: &Session<'_>, input: &Path, options: &OptionSet) -> Result<Self> {
        let settings = session.config.settings();
        let name = options.value("name")?;

        let (token, allowed) = match command {
            ShapeCommand::Plot => {
                let vis = VisOptions::parse(options.value("vis")?.unwrap_or(&settings.plot_vis));
                let destination = match name {
                    Some(name) => PathBuf::from(name),
                    None => figure_path(input)?,
                };
                return Ok(Target::Figure { vis, destination });
            }
            ShapeCommand::Eval => (options.value("format")?.unwrap_or(&settings.eval_format), Format::POINTS),
            ShapeCommand::Export => (options.value("format")?.unwrap_or(&settings.export_format), Format::EXCHANGE),
        };

        let format = Format::parse(token, allowed)?;
        ExportRequest::new(format, input, name).map(Target::Exchange)
    }
}

fn figure_path(input: &Path) -> Result<PathBuf> {
    let derived = input.with_extension("svg");
    if derived == input {
        return Err(CliError::DestinationConflict(derived));
    }
    Ok(derived)
}

pub fn run(command: ShapeCommand, session: &Session<'_>, file: &str, options: &OptionSet) -> Result<()> {
    let output = &session.output;
    let input = Path::new(file);

    let target = Target::new(command, session, input, options)?;
    let overrides = options.overrides(session.config.settings().delta)?;
    let input_type = InputType::detect(input, options.value("type")?)?;
    output.verbose_ctx("input", &format!("{} as {:?}, {:?}", input.display(), input_type, overrides));

    let rendered = template::render_file(input)?;
    let staged = StagedFile::stage(&rendered, input.extension().and_then(|ext| ext.to_str()))?;
    output.verbose_ctx("template", &format!("rendered into {}", staged.path().display()));

    let root = input_type.parse(input, &staged.read()?)?;
    let document = ShapeDocument::from_value(&root)?;
    let resolved = resolve(&document.data, &document.kind, overrides)?;
    output.verbose_ctx(
        "resolve",
        &format!(
            "{} {}(s), delta {}",
            resolved.shapes().len(),
            resolved.kind(),
            resolved.delta()
        ),
    );

    match target {
        Target::Figure { vis, destination } => {
            output.verbose_ctx("plot", &format!("{vis:?}"));
            let svg = render::plot(&resolved, &vis)?;
            fs::write(&destination, svg).map_err(|e| CliError::write(&destination, e))?;
            output.verbose_ctx("plot", &format!("saved {}", destination.display()));
        }
        Target::Exchange(request) => {
            let stdout = io::stdout();
            request.write(&resolved, &mut stdout.lock())?;
            if let Some(destination) = &request.destination {
                output.verbose_ctx(
                    "export",
                    &format!("saved {} as {}", destination.display(), request.format.as_str()),
                );
            }
        }
    }

    Ok(())
}
