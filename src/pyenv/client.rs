use crate::error::{PyupError, Result};
use crate::pyenv::listing::{parse_available_listing, parse_installed_listing};
use crate::python::version::PyVersion;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const PYENV_BIN: &str = "pyenv";

/// PyenvClient wraps the pyenv executable
pub struct PyenvClient {
    binary: PathBuf,
}

impl PyenvClient {
    /// Locate the pyenv executable on PATH
    pub fn locate() -> Result<Self> {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        Self::find_in_path(PYENV_BIN, &path_var)
            .map(|binary| Self { binary })
            .ok_or(PyupError::PyenvNotFound)
    }

    fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
        std::env::split_paths(path_var)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }

    /// Run pyenv with the given arguments and return captured stdout
    pub fn execute(&self, args: &[&str]) -> Result<String> {
        if std::env::var("PYUP_VERBOSE").is_ok() {
            eprintln!(
                "[VERBOSE] Executing: {} {}",
                self.binary.display(),
                args.join(" ")
            );
        }

        let output = Command::new(&self.binary).args(args).output().map_err(|e| {
            PyupError::PyenvExecution(format!(
                "failed to execute pyenv {}: {e}",
                args.join(" ")
            ))
        })?;

        Self::ensure_success(&output, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn ensure_success(output: &Output, args: &[&str]) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(PyupError::PyenvExecution(format!(
            "pyenv {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }

    /// Update pyenv itself and its list of installable versions
    pub fn update(&self) -> Result<()> {
        self.execute(&["update"]).map(|_| ())
    }

    /// Versions pyenv can install
    pub fn available_versions(&self) -> Result<Vec<PyVersion>> {
        let output = self.execute(&["install", "--list"])?;
        Ok(parse_available_listing(&output))
    }

    /// Versions currently installed locally
    pub fn installed_versions(&self) -> Result<Vec<PyVersion>> {
        let output = self.execute(&["versions"])?;
        Ok(parse_installed_listing(&output))
    }

    pub fn install(&self, version: &PyVersion) -> Result<String> {
        let ident = version.to_string();
        self.execute(&["install", "--force", &ident])
    }

    pub fn uninstall(&self, version: &PyVersion) -> Result<String> {
        let ident = version.to_string();
        self.execute(&["uninstall", "--force", &ident])
    }

    /// Set global shim priority. The literal `system` entry leads so the OS
    /// interpreter stays reachable behind the managed versions.
    pub fn set_global(&self, versions: &[PyVersion]) -> Result<()> {
        let mut args: Vec<String> = vec!["global".to_string(), "system".to_string()];
        args.extend(versions.iter().map(|v| v.to_string()));

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.execute(&arg_refs).map(|_| ())
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn finds_executable_on_synthetic_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let binary = dir.path().join("pyenv");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(
            PyenvClient::find_in_path("pyenv", &path_var),
            Some(binary)
        );
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let binary = dir.path().join("pyenv");
        std::fs::write(&binary, "").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644)).unwrap();

        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(PyenvClient::find_in_path("pyenv", &path_var), None);
    }

    #[test]
    fn missing_binary_is_not_found() {
        let dir = tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(PyenvClient::find_in_path("pyenv", &path_var), None);
    }
}
