use crate::python::support::SupportStatus;
use crate::python::version::{MainVersion, PyVersion};
use colored::{ColoredString, Colorize};
use std::collections::{BTreeMap, BTreeSet};

/// Pretty-print the support status of every release line that is either
/// listed on python.org or present locally.
pub fn print_version_report(
    status: &BTreeMap<MainVersion, SupportStatus>,
    available: &BTreeSet<PyVersion>,
    installed: &BTreeSet<PyVersion>,
) {
    println!("{}", "Version Report:".cyan().bold());

    let mut lines: BTreeSet<MainVersion> = status.keys().copied().collect();
    lines.extend(installed.iter().map(PyVersion::main));

    for line in lines {
        let line_status = status
            .get(&line)
            .copied()
            .unwrap_or(SupportStatus::Unsupported);

        println!(
            "  {} ({})",
            format!("Python {}.{}", line.0, line.1).bold(),
            styled_status(line_status)
        );

        let members: Vec<&PyVersion> = installed.iter().filter(|v| v.main() == line).collect();
        let latest = available.iter().filter(|v| v.main() == line).max();

        for &version in &members {
            let is_latest = latest == Some(version);
            match (line_status, is_latest) {
                (SupportStatus::Unsupported, true) => println!(
                    "    {version} (installed, {}, {})",
                    "unsupported".yellow(),
                    "latest".green()
                ),
                (SupportStatus::Unsupported, false) => {
                    println!("    {version} (installed, {})", "unsupported".yellow())
                }
                (_, true) => println!("    {version} (installed, {})", "latest".green()),
                (_, false) => println!("    {version} (installed, {})", "out-of-date".yellow()),
            }
        }

        if let Some(latest) = latest {
            if !installed.contains(latest) {
                if line_status == SupportStatus::Unsupported {
                    println!(
                        "    {latest} ({}, {})",
                        "unsupported".yellow(),
                        "latest".green()
                    );
                } else {
                    println!("    {latest} ({})", "latest".green());
                }
            }
        }

        println!();
    }
}

fn styled_status(status: SupportStatus) -> ColoredString {
    match status {
        SupportStatus::Prerelease => "prerelease".cyan(),
        SupportStatus::Bugfix => "bugfix".green(),
        SupportStatus::Security => "security".yellow(),
        SupportStatus::Unsupported => "unsupported".red(),
    }
}
