//! CLI integration tests for nurbs-cli
//!
//! Every test runs the binary inside a scratch working directory with a
//! scratch home directory, so no real configuration is picked up.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the nurbs binary
fn nurbs_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("nurbs"))
}

/// Isolated working and home directories
struct Workspace {
    cwd: TempDir,
    home: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            cwd: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = nurbs_cmd();
        cmd.current_dir(self.cwd.path()).env("HOME", self.home.path());
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.cwd.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.cwd.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

const TWO_LINES: &str = "\
shape:
  type: curve
  data:
    - degree: 1
      knotvector: [0, 0, 1, 1]
      control_points:
        points: [[0, 0], [1, 0]]
      delta: 0.5
    - degree: 1
      knotvector: [0, 0, 1, 1]
      control_points:
        points: [[0, 1], [2, 1]]
      delta: 0.5
";

const TWO_LINES_POINTS: &str = "0.0, 0.0\n0.5, 0.0\n1.0, 0.0\n---\n0.0, 1.0\n1.0, 1.0\n2.0, 1.0\n";

const TEMPLATED_LINE: &str = "\
shape:
  type: curve
  data:
    degree: 1
    knotvector: <{ knot_vector(1, 2) }>
    control_points:
      points:
<# one point per iteration #>
<% for i in range(2) %>
        - [<{ i }>, <{ pow(i, 2) }>]
<% endfor %>
    delta: 0.5
";

const PLANE: &str = "\
shape:
  type: surface
  data:
    degree_u: 1
    degree_v: 1
    size_u: 2
    size_v: 2
    knotvector_u: [0, 0, 1, 1]
    knotvector_v: [0, 0, 1, 1]
    control_points:
      points: [[0, 0, 0], [0, 1, 0], [1, 0, 0], [1, 1, 1]]
    delta: 0.5
";

#[cfg(unix)]
fn install_command(config_root: &Path, name: &str, reply: &str) {
    use std::os::unix::fs::PermissionsExt;

    let dir = config_root.join(".nurbs-cli");
    fs::create_dir_all(&dir).unwrap();

    let script = dir.join(format!("{name}.sh"));
    fs::write(
        &script,
        format!("#!/bin/sh\nread request\necho '{{\"success\": true, \"data\": \"{reply}\"}}'\n"),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    fs::write(
        dir.join("config.json"),
        format!(
            r#"{{"commands": {{"{name}": {{"description": "{reply}", "program": "{name}.sh", "args": 1}}}}}}"#
        ),
    )
    .unwrap();
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_no_command_prints_usage() {
    let ws = Workspace::new();

    ws.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Available commands:"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_help_command_lists_commands() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plot"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("'frobnicate' is not available"))
        .stderr(predicate::str::contains("eval"));
}

#[test]
fn test_command_help_skips_handler() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["eval", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("EVAL:"));
}

#[test]
fn test_missing_argument_prints_help_and_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("export")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("EXPORT:"))
        .stderr(predicate::str::contains("expects 1 argument(s), got 0"));
}

// =============================================================================
// Eval Tests
// =============================================================================

#[test]
fn test_eval_collection_separator() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    let assert = ws.cmd().args(["eval", "lines.yaml"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert_eq!(stdout, TWO_LINES_POINTS);
    assert_eq!(stdout.lines().filter(|l| *l == "---").count(), 1);
}

#[test]
fn test_eval_index_selects_one_shape() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["eval", "lines.yaml", "--index=1"])
        .assert()
        .success()
        .stdout("0.0, 1.0\n1.0, 1.0\n2.0, 1.0\n");
}

#[test]
fn test_eval_index_out_of_range() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["eval", "lines.yaml", "--index=5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_eval_delta_override() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    let assert = ws
        .cmd()
        .args(["eval", "lines.yaml", "--index=0", "--delta=0.25"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn test_eval_templated_input() {
    let ws = Workspace::new();
    ws.write("templated.yaml", TEMPLATED_LINE);

    ws.cmd()
        .args(["eval", "templated.yaml"])
        .assert()
        .success()
        .stdout("0.0, 0.0\n0.5, 0.5\n1.0, 1.0\n");
}

#[test]
fn test_eval_template_error() {
    let ws = Workspace::new();
    ws.write("broken.yaml", "shape: <{ pow(2 }>\n");

    ws.cmd()
        .args(["eval", "broken.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template error in 'broken.yaml'"));
}

#[test]
fn test_eval_missing_key() {
    let ws = Workspace::new();
    ws.write(
        "nokv.yaml",
        "shape:\n  type: curve\n  data:\n    degree: 1\n    control_points: {points: [[0, 0], [1, 1]]}\n",
    );

    ws.cmd()
        .args(["eval", "nokv.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Required key does not exist in the input data: knotvector",
        ));
}

fn line_with_delta(delta: &str) -> String {
    format!(
        "shape:\n  type: curve\n  data:\n    degree: 1\n    knotvector: [0, 0, 1, 1]\n    control_points: {{points: [[0, 0], [1, 1]]}}\n    delta: {delta}\n"
    )
}

#[test]
fn test_eval_rejects_out_of_range_delta_in_file() {
    let ws = Workspace::new();

    for (name, delta) in [("zero.yaml", "0"), ("negative.yaml", "-0.5"), ("tiny.yaml", "0.00001")] {
        ws.write(name, &line_with_delta(delta));

        ws.cmd()
            .args(["eval", name])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Invalid shape data"))
            .stderr(predicate::str::contains("delta"));
    }
}

#[test]
fn test_eval_rejects_tiny_delta_option() {
    let ws = Workspace::new();
    ws.write("line.yaml", &line_with_delta("0.5"));

    ws.cmd()
        .args(["eval", "line.yaml", "--delta=1e-12"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for --delta"));
}

#[cfg(unix)]
#[test]
fn test_staged_input_removed_on_every_exit_path() {
    let ws = Workspace::new();
    let tmp = TempDir::new().unwrap();
    ws.write("lines.yaml", TWO_LINES);
    ws.write(
        "nokv.yaml",
        "shape:\n  type: curve\n  data:\n    degree: 1\n    control_points: {points: [[0, 0], [1, 1]]}\n",
    );

    ws.cmd()
        .env("TMPDIR", tmp.path())
        .args(["eval", "lines.yaml"])
        .assert()
        .success();
    ws.cmd()
        .env("TMPDIR", tmp.path())
        .args(["eval", "nokv.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("knotvector"));

    let leftovers: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("nurbs-input-"))
        .collect();
    assert!(leftovers.is_empty(), "staged files left behind: {leftovers:?}");
}

#[test]
fn test_eval_missing_file() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["eval", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open file 'nope.yaml'"));
}

#[test]
fn test_eval_csv_file() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["eval", "lines.yaml", "--format=csv", "--name=points.csv"])
        .assert()
        .success()
        .stdout("");

    let csv = fs::read_to_string(ws.cwd.path().join("points.csv")).unwrap();
    assert!(csv.starts_with("x,y\n0.0,0.0\n"));
    assert_eq!(csv.lines().count(), 7);
}

#[test]
fn test_eval_type_override() {
    let ws = Workspace::new();
    ws.write("lines.txt", TWO_LINES);

    ws.cmd()
        .args(["eval", "lines.txt", "--type=yaml"])
        .assert()
        .success()
        .stdout(TWO_LINES_POINTS);

    ws.cmd()
        .args(["eval", "lines.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'txt' is not supported"));
}

#[test]
fn test_eval_cfg_input() {
    let ws = Workspace::new();
    ws.write(
        "line.cfg",
        r#"shape = {
  type = "curve";
  data = {
    degree = 1;
    knotvector = [0.0, 0.0, 1.0, 1.0];
    control_points = { points = ([0.0, 0.0], [1.0, 0.0]); };
    delta = 0.5;
  };
};
"#,
    );

    ws.cmd()
        .args(["eval", "line.cfg"])
        .assert()
        .success()
        .stdout("0.0, 0.0\n0.5, 0.0\n1.0, 0.0\n");
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_bogus_format_creates_nothing() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["export", "lines.yaml", "--format=bogus"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Cannot use 'bogus' format. Possible types: cfg, json, yaml, obj, stl, off, smesh",
        ));

    assert_eq!(ws.entries(), vec!["lines.yaml"]);
}

#[test]
fn test_eval_rejects_exchange_format() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["eval", "lines.yaml", "--format=json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Possible types: screen, csv, txt, vtk"));

    assert_eq!(ws.entries(), vec!["lines.yaml"]);
}

#[test]
fn test_export_json_reads_back() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd().args(["export", "lines.yaml"]).assert().success();
    assert!(ws.cwd.path().join("lines.json").is_file());

    ws.cmd()
        .args(["eval", "lines.json"])
        .assert()
        .success()
        .stdout(TWO_LINES_POINTS);
}

#[test]
fn test_export_cfg_reads_back() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["export", "lines.yaml", "--format=cfg", "--index=1"])
        .assert()
        .success();

    ws.cmd()
        .args(["eval", "lines.cfg"])
        .assert()
        .success()
        .stdout("0.0, 1.0\n1.0, 1.0\n2.0, 1.0\n");
}

#[test]
fn test_export_never_overwrites_input() {
    let ws = Workspace::new();
    ws.write("lines.json", "{}");

    ws.cmd()
        .args(["export", "lines.json", "--format=json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));

    assert_eq!(fs::read_to_string(ws.cwd.path().join("lines.json")).unwrap(), "{}");
}

#[test]
fn test_export_surface_mesh() {
    let ws = Workspace::new();
    ws.write("plane.yaml", PLANE);

    ws.cmd()
        .args(["export", "plane.yaml", "--format=obj"])
        .assert()
        .success();

    let obj = fs::read_to_string(ws.cwd.path().join("plane.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 9);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 8);
}

#[test]
fn test_export_curve_mesh_unsupported() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["export", "lines.yaml", "--format=stl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only export surfaces"));

    assert_eq!(ws.entries(), vec!["lines.yaml"]);
}

// =============================================================================
// Plot Tests
// =============================================================================

#[test]
fn test_plot_writes_svg() {
    let ws = Workspace::new();
    ws.write("plane.yaml", PLANE);

    ws.cmd()
        .args(["plot", "plane.yaml", "--vis=legend:on;ctrlpts:off"])
        .assert()
        .success();

    let svg = fs::read_to_string(ws.cwd.path().join("plane.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Surface 1"));
    assert!(!svg.contains("class=\"ctrlpts\""));
}

#[test]
fn test_plot_named_output_default_vis() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);

    ws.cmd()
        .args(["plot", "lines.yaml", "--name=figure.svg"])
        .assert()
        .success();

    let svg = fs::read_to_string(ws.cwd.path().join("figure.svg")).unwrap();
    assert!(!svg.contains("<text"));
    assert_eq!(svg.matches("class=\"evalpts\"").count(), 2);
}

// =============================================================================
// Configuration and External Command Tests
// =============================================================================

#[test]
fn test_configuration_defaults() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);
    fs::create_dir_all(ws.cwd.path().join(".nurbs-cli")).unwrap();
    fs::write(
        ws.cwd.path().join(".nurbs-cli/config.json"),
        r#"{"configuration": {"export_format": "yaml"}}"#,
    )
    .unwrap();

    ws.cmd().args(["export", "lines.yaml", "--name=out.yml"]).assert().success();

    ws.cmd()
        .args(["eval", "out.yml"])
        .assert()
        .success()
        .stdout(TWO_LINES_POINTS);
}

#[test]
fn test_verbose_lists_configuration_layers() {
    let ws = Workspace::new();
    for root in [ws.cwd.path(), ws.home.path()] {
        fs::create_dir_all(root.join(".nurbs-cli")).unwrap();
        fs::write(root.join(".nurbs-cli/config.json"), r#"{"configuration": {}}"#).unwrap();
    }

    let assert = ws.cmd().args(["version", "--verbose"]).assert().success();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();

    let layers: Vec<&str> = stderr.lines().filter(|l| l.starts_with("[verbose:config] layer")).collect();
    assert_eq!(layers.len(), 2);
    assert!(layers[0].starts_with("[verbose:config] layer 1:"));
    assert!(layers[1].contains(&ws.home.path().display().to_string()));
}

#[test]
fn test_malformed_configuration_fails() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.home.path().join(".nurbs-cli")).unwrap();
    fs::write(ws.home.path().join(".nurbs-cli/config.json"), "{ nope").unwrap();

    ws.cmd()
        .arg("help")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("custom configuration file"));
}

#[test]
fn test_debug_prints_error_detail() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["eval", "nope.yaml", "--debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[debug] FileAccess"));
}

#[cfg(unix)]
#[test]
fn test_external_command() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);
    install_command(ws.cwd.path(), "stats", "stats from cwd");

    ws.cmd()
        .args(["stats", "lines.yaml"])
        .assert()
        .success()
        .stdout("stats from cwd\n");

    ws.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stats from cwd"));

    ws.cmd()
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("STATS: stats from cwd"));
}

#[cfg(unix)]
#[test]
fn test_home_configuration_wins() {
    let ws = Workspace::new();
    ws.write("lines.yaml", TWO_LINES);
    install_command(ws.cwd.path(), "stats", "stats from cwd");
    install_command(ws.home.path(), "stats", "stats from home");

    ws.cmd()
        .args(["stats", "lines.yaml"])
        .assert()
        .success()
        .stdout("stats from home\n");
}
