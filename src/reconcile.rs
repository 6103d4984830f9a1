use crate::python::version::{MainVersion, PyVersion};
use std::collections::BTreeSet;
use std::fmt;

/// A pyenv operation the upgrade plan asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Op {
    Install,
    Remove,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Op::Install => "install",
            Op::Remove => "remove",
        };
        f.write_str(label)
    }
}

/// Calculate the install/remove operations that align the installed set with
/// the supported release lines.
///
/// Prerelease and build-tagged available versions are ignored. Emission order
/// carries no meaning; callers sort before display. `keep_bugfix` suppresses
/// removal of outdated bugfix releases, `remove_minor` extends removal to the
/// latest release of an unsupported line.
pub fn calculate_changes(
    supported: &BTreeSet<PyVersion>,
    available: &BTreeSet<PyVersion>,
    installed: &BTreeSet<PyVersion>,
    keep_bugfix: bool,
    remove_minor: bool,
) -> Vec<(PyVersion, Op)> {
    let verbose = std::env::var("PYUP_VERBOSE").is_ok();

    let stable: Vec<&PyVersion> = available.iter().filter(|v| v.is_stable()).collect();

    let main_sup: BTreeSet<MainVersion> = supported.iter().map(PyVersion::main).collect();
    let main_old: BTreeSet<MainVersion> = installed
        .iter()
        .map(PyVersion::main)
        .filter(|m| !main_sup.contains(m))
        .collect();

    let mut changes = Vec::new();

    for &line in &main_sup {
        let avail: Vec<&PyVersion> = stable.iter().copied().filter(|v| v.main() == line).collect();
        let installed_line: Vec<&PyVersion> =
            installed.iter().filter(|v| v.main() == line).collect();

        let latest = avail.into_iter().max();

        if let Some(latest) = latest {
            if !installed_line.contains(&latest) {
                if verbose {
                    eprintln!(
                        "[VERBOSE] Latest {} bugfix ({latest}) needs to be installed",
                        latest.main_format()
                    );
                }
                changes.push((latest.clone(), Op::Install));
            }
        }

        // Removals in a supported line are gated on a latest version having
        // been established from the available listing. An empty listing keeps
        // every install in place, even with keep_bugfix unset.
        if !keep_bugfix {
            if let Some(latest) = latest {
                for &v in installed_line.iter().rev() {
                    if v != latest {
                        if verbose {
                            eprintln!(
                                "[VERBOSE] Outdated {} bugfix ({v}) needs to be removed",
                                v.main_format()
                            );
                        }
                        changes.push((v.clone(), Op::Remove));
                    }
                }
            }
        }
    }

    for &line in &main_old {
        let installed_line: Vec<&PyVersion> =
            installed.iter().filter(|v| v.main() == line).collect();

        let Some(latest) = installed_line.iter().copied().max() else {
            continue;
        };

        for &v in installed_line.iter().rev() {
            if v == latest {
                if remove_minor {
                    if verbose {
                        eprintln!(
                            "[VERBOSE] Unsupported {} minor ({v}) needs to be removed",
                            v.main_format()
                        );
                    }
                    changes.push((v.clone(), Op::Remove));
                }
            } else if !keep_bugfix {
                if verbose {
                    eprintln!(
                        "[VERBOSE] Unsupported {} bugfix ({v}) needs to be removed",
                        v.main_format()
                    );
                }
                changes.push((v.clone(), Op::Remove));
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(items: &[(u32, u32, u32)]) -> BTreeSet<PyVersion> {
        items
            .iter()
            .map(|&(major, minor, patch)| PyVersion::new(major, minor, patch))
            .collect()
    }

    fn plan(
        supported: &[(u32, u32, u32)],
        available: &[(u32, u32, u32)],
        installed: &[(u32, u32, u32)],
        keep_bugfix: bool,
        remove_minor: bool,
    ) -> Vec<(PyVersion, Op)> {
        let mut changes = calculate_changes(
            &versions(supported),
            &versions(available),
            &versions(installed),
            keep_bugfix,
            remove_minor,
        );
        changes.sort();
        changes
    }

    fn expected(items: &[((u32, u32, u32), Op)]) -> Vec<(PyVersion, Op)> {
        let mut result: Vec<(PyVersion, Op)> = items
            .iter()
            .map(|&((major, minor, patch), op)| (PyVersion::new(major, minor, patch), op))
            .collect();
        result.sort();
        result
    }

    #[test]
    fn supported_upgrade_replace() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[(3, 10, 5)], &[(3, 10, 0)], false, false),
            expected(&[((3, 10, 5), Op::Install), ((3, 10, 0), Op::Remove)]),
        );
    }

    #[test]
    fn supported_upgrade_remove_multiple() {
        assert_eq!(
            plan(
                &[(3, 10, 0)],
                &[(3, 10, 5)],
                &[(3, 10, 0), (3, 10, 1)],
                false,
                false,
            ),
            expected(&[
                ((3, 10, 5), Op::Install),
                ((3, 10, 1), Op::Remove),
                ((3, 10, 0), Op::Remove),
            ]),
        );
    }

    #[test]
    fn supported_upgrade_add() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[(3, 10, 5)], &[(3, 10, 0)], true, false),
            expected(&[((3, 10, 5), Op::Install)]),
        );
    }

    #[test]
    fn supported_new_add() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[(3, 10, 5)], &[], true, false),
            expected(&[((3, 10, 5), Op::Install)]),
        );
    }

    #[test]
    fn unsupported_latest_keep() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[(3, 5, 0)], &[(3, 5, 0)], false, false),
            expected(&[]),
        );
    }

    #[test]
    fn unsupported_latest_remove() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[(3, 5, 0)], &[(3, 5, 0)], false, true),
            expected(&[((3, 5, 0), Op::Remove)]),
        );
    }

    #[test]
    fn unsupported_bugfix_remove() {
        assert_eq!(
            plan(
                &[(3, 10, 0)],
                &[(3, 5, 0), (3, 5, 1)],
                &[(3, 5, 0), (3, 5, 1)],
                false,
                false,
            ),
            expected(&[((3, 5, 0), Op::Remove)]),
        );
    }

    #[test]
    fn unsupported_bugfix_remove_all() {
        assert_eq!(
            plan(
                &[(3, 10, 0)],
                &[(3, 5, 0), (3, 5, 1)],
                &[(3, 5, 0), (3, 5, 1)],
                false,
                true,
            ),
            expected(&[((3, 5, 1), Op::Remove), ((3, 5, 0), Op::Remove)]),
        );
    }

    #[test]
    fn keep_bugfix_with_remove_minor() {
        // Supported lines keep their outdated bugfixes; unsupported lines
        // still lose their latest but keep older bugfixes.
        assert_eq!(
            plan(
                &[(3, 10, 0)],
                &[(3, 10, 5)],
                &[(3, 10, 0), (3, 5, 0), (3, 5, 1)],
                true,
                true,
            ),
            expected(&[((3, 10, 5), Op::Install), ((3, 5, 1), Op::Remove)]),
        );
    }

    #[test]
    fn supported_line_with_empty_listing_removes_nothing() {
        assert_eq!(
            plan(&[(3, 10, 0)], &[], &[(3, 10, 0), (3, 10, 1)], false, false),
            expected(&[]),
        );
    }

    #[test]
    fn prerelease_availability_is_ignored() {
        let mut available = versions(&[(3, 10, 1)]);
        available.insert(PyVersion {
            prerelease: "dev".to_string(),
            ..PyVersion::new(3, 10, 9)
        });

        let mut changes = calculate_changes(
            &versions(&[(3, 10, 0)]),
            &available,
            &versions(&[(3, 10, 1)]),
            false,
            false,
        );
        changes.sort();
        assert_eq!(changes, expected(&[]));
    }

    #[test]
    fn no_version_gets_conflicting_operations() {
        let changes = plan(
            &[(3, 10, 0), (3, 11, 0)],
            &[(3, 10, 5), (3, 11, 2)],
            &[(3, 10, 0), (3, 10, 5), (3, 9, 1), (3, 9, 2)],
            false,
            true,
        );
        let mut seen = std::collections::HashMap::new();
        for (version, op) in &changes {
            assert!(
                seen.insert(version.clone(), *op).is_none(),
                "duplicate op for {version}"
            );
        }
    }

    #[test]
    fn applying_the_plan_converges() {
        let supported = versions(&[(3, 10, 0), (3, 11, 0)]);
        let available = versions(&[(3, 10, 5), (3, 11, 2), (3, 5, 1)]);
        let installed = versions(&[(3, 10, 0), (3, 5, 0), (3, 5, 1)]);

        let changes = calculate_changes(&supported, &available, &installed, false, false);
        let mut next = installed.clone();
        for (version, op) in &changes {
            match op {
                Op::Install => {
                    next.insert(version.clone());
                }
                Op::Remove => {
                    next.remove(version);
                }
            }
        }

        assert!(calculate_changes(&supported, &available, &next, false, false).is_empty());
    }
}
