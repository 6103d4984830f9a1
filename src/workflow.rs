use crate::error::Result;
use crate::pyenv::PyenvClient;
use crate::python::support::PythonOrgClient;
use crate::python::version::{MainVersion, PyVersion};
use crate::reconcile::{calculate_changes, Op};
use crate::report;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;

/// Execute the upgrade workflow
pub fn execute_upgrade(
    keep_bugfix: bool,
    remove_minor: bool,
    no_update: bool,
    dry_run: bool,
) -> Result<()> {
    println!(
        "{}",
        "Upgrading pyenv-managed Python versions...".cyan().bold()
    );

    println!("\n{}", "1. Locating pyenv...".yellow());
    let pyenv = PyenvClient::locate()?;
    println!("{}", "✓ pyenv is installed".green());

    if no_update {
        println!("\n{}", "2. Skipping pyenv update".yellow());
    } else {
        println!("\n{}", "2. Updating pyenv...".yellow());
        pyenv.update()?;
        println!("{}", "✓ pyenv is up to date".green());
    }

    println!("\n{}", "3. Scraping supported Python versions...".yellow());
    let support = PythonOrgClient::new()?.supported_versions()?;
    let supported: BTreeSet<PyVersion> = support
        .iter()
        .filter(|(_, status)| status.is_supported())
        .map(|(&(major, minor), _)| PyVersion::new(major, minor, 0))
        .collect();
    println!("   Found {} supported release lines", supported.len());

    println!(
        "\n{}",
        "4. Enumerating available and installed versions...".yellow()
    );
    let available: BTreeSet<PyVersion> = pyenv
        .available_versions()?
        .into_iter()
        .filter(PyVersion::is_stable)
        .collect();
    let installed: BTreeSet<PyVersion> = pyenv.installed_versions()?.into_iter().collect();
    println!(
        "   {} stable versions available, {} installed",
        available.len(),
        installed.len()
    );

    let mut plan = calculate_changes(&supported, &available, &installed, keep_bugfix, remove_minor);

    println!();
    report::print_version_report(&support, &available, &installed);

    if plan.is_empty() {
        println!("{}", "No changes required.".green().bold());
        return Ok(());
    }

    plan.sort();
    plan.reverse();

    for (version, op) in &plan {
        match op {
            Op::Install => println!(
                "  {} {}",
                "+ Install".green().bold(),
                version.fixed_width().green()
            ),
            Op::Remove => println!(
                "  {} {}",
                "- Remove ".red().bold(),
                version.fixed_width().red()
            ),
        }
    }

    if dry_run {
        println!("\n{}", "Dry run: no changes were applied.".yellow());
        return Ok(());
    }

    println!("\n{}", "5. Applying changes...".yellow());
    apply_changes(&pyenv, &plan)?;
    println!("{}", "✓ Changes applied".green());

    println!("\n{}", "6. Updating global shims...".yellow());
    let shims = latest_per_line(&pyenv.installed_versions()?);
    pyenv.set_global(&shims)?;
    for version in &shims {
        println!("   • {}", version.to_string().bright_cyan());
    }

    println!("\n{}", "✨ Upgrade completed successfully!".green().bold());
    Ok(())
}

/// Execute the status workflow - report without touching anything
pub fn execute_status() -> Result<()> {
    println!(
        "{}",
        "Checking Python installation support status...".cyan().bold()
    );

    println!("\n{}", "1. Locating pyenv...".yellow());
    let pyenv = PyenvClient::locate()?;
    println!("{}", "✓ pyenv is installed".green());

    println!("\n{}", "2. Scraping supported Python versions...".yellow());
    let support = PythonOrgClient::new()?.supported_versions()?;
    println!("   Found {} active release lines", support.len());

    println!(
        "\n{}",
        "3. Enumerating available and installed versions...".yellow()
    );
    let available: BTreeSet<PyVersion> = pyenv
        .available_versions()?
        .into_iter()
        .filter(PyVersion::is_stable)
        .collect();
    let installed: BTreeSet<PyVersion> = pyenv.installed_versions()?.into_iter().collect();

    println!();
    report::print_version_report(&support, &available, &installed);

    Ok(())
}

/// Run every install, then every removal, newest first
fn apply_changes(pyenv: &PyenvClient, plan: &[(PyVersion, Op)]) -> Result<()> {
    let verbose = std::env::var("PYUP_VERBOSE").is_ok();

    let to_install = plan.iter().filter(|(_, op)| *op == Op::Install);
    let to_remove = plan.iter().filter(|(_, op)| *op == Op::Remove);

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    for (version, _) in to_install {
        pb.set_message(format!("Installing {version}"));
        let output = pyenv.install(version)?;
        if verbose {
            eprintln!("[VERBOSE] {output}");
        }
        pb.inc(1);
    }

    for (version, _) in to_remove {
        pb.set_message(format!("Removing {version}"));
        let output = pyenv.uninstall(version)?;
        if verbose {
            eprintln!("[VERBOSE] {output}");
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(())
}

/// Latest installed version of each remaining line, newest line first
fn latest_per_line(installed: &[PyVersion]) -> Vec<PyVersion> {
    let lines: BTreeSet<MainVersion> = installed.iter().map(PyVersion::main).collect();

    let mut latest: Vec<PyVersion> = lines
        .into_iter()
        .filter_map(|line| {
            installed
                .iter()
                .filter(|v| v.main() == line)
                .max()
                .cloned()
        })
        .collect();

    latest.sort();
    latest.reverse();
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_per_line_picks_one_version_per_line() {
        let installed = vec![
            PyVersion::new(3, 10, 0),
            PyVersion::new(3, 10, 13),
            PyVersion::new(3, 11, 6),
            PyVersion::new(3, 9, 18),
        ];

        assert_eq!(
            latest_per_line(&installed),
            vec![
                PyVersion::new(3, 11, 6),
                PyVersion::new(3, 10, 13),
                PyVersion::new(3, 9, 18),
            ]
        );
    }

    #[test]
    fn latest_per_line_is_empty_for_no_installs() {
        assert!(latest_per_line(&[]).is_empty());
    }
}
