//! Main CLI application: configuration, dispatch and error reporting

use std::process::ExitCode;

use super::args::{Invocation, OptionSet};
use super::builtin;
use super::output::Output;
use crate::error::{CliError, Result};
use crate::storage::{CommandDescriptor, Config, ConfigBuilder, Handler, LoadOutcome};

/// Everything a command handler gets besides its arguments
pub struct Session<'a> {
    pub config: &'a Config,
    pub output: Output,
}

/// Runs the CLI for a full argument vector (program name first)
pub fn run(args: impl IntoIterator<Item = String>) -> ExitCode {
    let invocation = Invocation::parse(args);
    let options = &invocation.options;
    let output = Output::new(
        options.has("verbose") || options.has("debug"),
        options.has("debug"),
    );

    let result = load_config(&output).and_then(|config| {
        let session = Session {
            config: &config,
            output,
        };
        dispatch(&session, &invocation)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&e.to_string());
            output.debug_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Builds the configuration from the working and home directories
fn load_config(output: &Output) -> Result<Config> {
    let mut builder = ConfigBuilder::new();
    for dir in Config::search_dirs() {
        match builder.load_dir(&dir)? {
            LoadOutcome::Missing => {}
            LoadOutcome::Loaded(path) => output.verbose_ctx("config", &format!("loaded {}", path.display())),
            LoadOutcome::Unreadable(path, e) => {
                output.warn(&format!("Cannot read configuration file {}: {}", path.display(), e))
            }
        }
    }

    let config = builder.build();
    for (layer, path) in config.sources().iter().enumerate() {
        output.verbose_ctx("config", &format!("layer {}: {}", layer + 1, path.display()));
    }
    Ok(config)
}

fn dispatch(session: &Session<'_>, invocation: &Invocation) -> Result<()> {
    let registry = session.config.registry();
    let Some(name) = invocation.command() else {
        session.output.success(&builtin::usage(registry));
        return Ok(());
    };

    let command = registry.get(name).ok_or_else(|| CliError::UnknownCommand {
        name: name.to_string(),
        known: registry.names(),
    })?;

    if invocation.options.has("help") {
        session.output.success(&command.help_text());
        return Ok(());
    }

    let args = invocation.args();
    if args.len() < command.arity {
        session.output.usage(&command.help_text());
        return Err(CliError::ArgumentArity {
            command: command.name.clone(),
            expected: command.arity,
            got: args.len(),
        });
    }

    session
        .output
        .verbose_ctx("dispatch", &format!("{} ({}) with {} argument(s)", command.name, command.source, args.len()));
    execute(session, command, args, &invocation.options)
}

fn execute(session: &Session<'_>, command: &CommandDescriptor, args: &[String], options: &OptionSet) -> Result<()> {
    match &command.handler {
        Handler::Builtin(builtin) => builtin.run(session, args, options),
        Handler::External(external) => {
            let response = external.run(&command.name, args, options.to_json())?;
            if let Some(text) = response.display_data() {
                session.output.success(&text);
            }
            Ok(())
        }
    }
}
