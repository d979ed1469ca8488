#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const CLEAN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Shop</title>
  <style>nav > ul { margin: 0 }</style>
</head>
<body>
  <img src="logo.png" alt="Logo">
  <p id="intro">Welcome<br>back</p>
  <script>
    function addToCart(id) {
      if (id < 10 && id > 0) { return "<span>"; }
    }
  </script>
  <button onclick="addToCart(3)">Buy</button>
</body>
</html>
"#;

pub const BROKEN_PAGE: &str = r#"<html>
<body>
  <div><p>text</div>
  <img src="a.png">
  <span id="x"></span><span id="x"></span>
</body>
</html>
"#;

/// Write `content` to `name` under `dir` and return the full path
pub fn write_page(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Run the binary with `args` from `work_dir`, isolated from any
/// VALIDATE_HTML_* settings and user configuration files
pub fn run_validator<I, S>(work_dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut command = Command::new(env!("CARGO_BIN_EXE_validate-html"));
    for (key, _) in std::env::vars() {
        if key.starts_with("VALIDATE_HTML_") {
            command.env_remove(key);
        }
    }
    command
        .current_dir(work_dir)
        .env("XDG_CONFIG_HOME", work_dir.join(".config"))
        .args(args)
        .output()
        .expect("Failed to execute validate-html")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
