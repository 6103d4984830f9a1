use crate::python::version::PyVersion;
use colored::Colorize;

/// Parse the output of `pyenv install --list`.
///
/// The listing mixes CPython identifiers with headers and distribution
/// builds (anaconda, pypy, ...); anything whose first character is not a
/// digit is skipped outright. Digit-leading lines that still fail to parse
/// warn and are skipped, so one odd entry never aborts the scan.
pub fn parse_available_listing(output: &str) -> Vec<PyVersion> {
    let verbose = std::env::var("PYUP_VERBOSE").is_ok();
    let mut found = Vec::new();

    for line in output.lines() {
        let ident = line.trim();

        if !ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }

        match PyVersion::parse(ident) {
            Ok(version) => {
                if verbose {
                    eprintln!("[VERBOSE] Found available version {version}");
                }
                found.push(version);
            }
            Err(e) => {
                eprintln!(
                    "{} unexpected invalid Python version: {ident} ({e})",
                    "Warning:".yellow()
                );
            }
        }
    }

    found
}

/// Parse the output of `pyenv versions`.
///
/// Each line carries one identifier, optionally prefixed with `*` for the
/// currently active entry; the literal `system` entry is not a semantic
/// version and is excluded.
pub fn parse_installed_listing(output: &str) -> Vec<PyVersion> {
    let verbose = std::env::var("PYUP_VERBOSE").is_ok();
    let mut found = Vec::new();

    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            continue;
        };

        let ident = if first == "*" {
            match parts.next() {
                Some(second) => second,
                None => continue,
            }
        } else {
            first
        };

        if ident == "system" {
            continue;
        }

        match PyVersion::parse(ident) {
            Ok(version) => {
                if verbose {
                    eprintln!("[VERBOSE] Found installed version {version}");
                }
                found.push(version);
            }
            Err(e) => {
                eprintln!(
                    "{} unexpected invalid Python version: {ident} ({e})",
                    "Warning:".yellow()
                );
            }
        }
    }

    found
}
