//! # Input Templating
//!
//! Input files are rendered through MiniJinja before they are parsed. The
//! default Jinja delimiters collide with YAML and JSON flow syntax
//! (`{a: {b: 1}}`), so the environment uses remapped delimiters:
//!
//! | Tag | Delimiters |
//! |-----|------------|
//! | Block | `<% ... %>` |
//! | Value | `<{ ... }>` |
//! | Comment | `<# ... #>` |
//!
//! ```text
//! shape:
//!   type: curve
//!   data:
//!     degree: 2
//!     knotvector: <{ knot_vector(2, 4) }>
//!     control_points:
//!       points:
//! <% for i in range(4) %>
//!         - [<{ i }>, <{ pow(i, 2) }>]
//! <% endfor %>
//! ```
//!
//! The function library is listed in [`functions`].

pub mod functions;

use std::fs;
use std::path::Path;

use minijinja::syntax::SyntaxConfig;
use minijinja::Environment;
use once_cell::sync::OnceCell;

use crate::error::{CliError, Result};

pub const BLOCK_DELIMITERS: (&str, &str) = ("<%", "%>");
pub const VARIABLE_DELIMITERS: (&str, &str) = ("<{", "}>");
pub const COMMENT_DELIMITERS: (&str, &str) = ("<#", "#>");

static ENVIRONMENT: OnceCell<Environment<'static>> = OnceCell::new();

fn environment() -> std::result::Result<&'static Environment<'static>, minijinja::Error> {
    ENVIRONMENT.get_or_try_init(|| {
        let syntax = SyntaxConfig::builder()
            .block_delimiters(BLOCK_DELIMITERS.0, BLOCK_DELIMITERS.1)
            .variable_delimiters(VARIABLE_DELIMITERS.0, VARIABLE_DELIMITERS.1)
            .comment_delimiters(COMMENT_DELIMITERS.0, COMMENT_DELIMITERS.1)
            .build()?;

        let mut env = Environment::new();
        env.set_syntax(syntax);
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        functions::register(&mut env);
        Ok(env)
    })
}

/// Renders template source. `name` only shows up in error messages.
pub fn render_str(name: &str, source: &str) -> std::result::Result<String, minijinja::Error> {
    environment()?.render_named_str(name, source, minijinja::context! {})
}

/// Reads and renders an input file
pub fn render_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).map_err(|source| CliError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    render_str(&path.display().to_string(), &source).map_err(|source| CliError::TemplateSyntax {
        path: path.to_path_buf(),
        source,
    })
}
