//! Go toolchain collaborator
//!
//! Implements [`Toolchain`] with `go list -json`, `go build -o` and
//! `go tool nm`, executed synchronously.

use crate::error::{PkgCacheError, PkgCacheResult};
use crate::toolchain::Toolchain;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Toolchain that shells out to a `go` binary
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
    workdir: Option<PathBuf>,
}

impl GoToolchain {
    /// Create a toolchain running `program`, optionally from `workdir`
    pub fn new(program: impl Into<PathBuf>, workdir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir,
        }
    }

    /// Program used to run toolchain commands
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check if the toolchain binary can be executed
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Execute a toolchain command and return its output
    pub(crate) fn exec(&self, args: &[&str]) -> PkgCacheResult<Output> {
        debug!("Executing: {} {:?}", self.program.display(), args);

        let mut cmd = Command::new(&self.program);
        cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
        if let Some(ref dir) = self.workdir {
            cmd.current_dir(dir);
        }

        cmd.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PkgCacheError::ToolNotFound {
                    name: self.program.display().to_string(),
                    hint: "Is it installed and on PATH?".to_string(),
                }
            } else {
                PkgCacheError::command_failed(
                    format!("{} {}", self.program.display(), args.join(" ")),
                    e,
                )
            }
        })
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go", None)
    }
}

/// Concatenate stdout and stderr the way a terminal would show them
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.trim_end().to_string()
}

impl Toolchain for GoToolchain {
    fn list(&self, identifier: &str) -> PkgCacheResult<Vec<u8>> {
        let output = self.exec(&["list", "-json", identifier])?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PkgCacheError::ListFailed {
                identifier: identifier.to_string(),
                reason: format!("{}: {}", output.status, stderr.trim_end()),
            })
        }
    }

    fn build(&self, identifier: &str, output: &Path) -> PkgCacheResult<()> {
        let out = output.to_string_lossy();
        let result = self.exec(&["build", "-o", &out, identifier])?;

        if result.status.success() {
            Ok(())
        } else {
            Err(PkgCacheError::BuildFailed {
                identifier: identifier.to_string(),
                output: combined_output(&result),
            })
        }
    }

    fn symbols(&self, artifact: &Path) -> PkgCacheResult<String> {
        let path = artifact.to_string_lossy();
        let output = self.exec(&["tool", "nm", &path])?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(PkgCacheError::InspectFailed {
                artifact: artifact.to_path_buf(),
                reason: format!("{}: {}", output.status, combined_output(&output)),
            })
        }
    }

    fn name(&self) -> &'static str {
        "go"
    }
}
