use crate::error::{PyupError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// The (major, minor) release line a concrete version belongs to
pub type MainVersion = (u32, u32);

/// Pattern adapted from the semver project's reference grammar, relaxed so
/// that the patch component may be omitted (pyenv lists e.g. "3.12-dev").
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^
        (?P<major>0|[1-9]\d*)
        (?:
            \.
            (?P<minor>0|[1-9]\d*)
            (?:
                \.
                (?P<patch>0|[1-9]\d*)
            )?
        )
        (?:-(?P<prerelease>
            (?:0|[1-9]\d*|\d*[a-z-][0-9a-z-]*)
            (?:\.(?:0|[1-9]\d*|\d*[a-z-][0-9a-z-]*))*
        ))?
        (?:\+(?P<build>
            [0-9a-z-]+
            (?:\.[0-9a-z-]+)*
        ))?
        $
    ",
    )
    .unwrap()
});

/// A CPython release identifier.
///
/// Ordering and equality are plain tuple semantics over
/// (major, minor, patch, prerelease, build) — the derive below relies on the
/// field order. An empty prerelease sorts before a non-empty one, and build
/// metadata participates in both comparison and equality, so `3.10.0+x` and
/// `3.10.0` are distinct versions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: String,
    pub build: String,
}

impl PyVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
        }
    }

    /// Parse a version identifier as pyenv and python.org print them.
    ///
    /// MAJOR and MINOR are required; PATCH defaults to 0 when absent.
    pub fn parse(text: &str) -> Result<Self> {
        let caps = VERSION_RE
            .captures(text)
            .ok_or_else(|| PyupError::InvalidVersion(text.to_string()))?;

        let number = |name: &str, default: u32| -> Result<u32> {
            match caps.name(name) {
                Some(m) => m
                    .as_str()
                    .parse::<u32>()
                    .map_err(|_| PyupError::InvalidVersion(text.to_string())),
                None => Ok(default),
            }
        };

        Ok(Self {
            major: number("major", 0)?,
            minor: number("minor", 0)?,
            patch: number("patch", 0)?,
            prerelease: caps
                .name("prerelease")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            build: caps
                .name("build")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// The release line this version belongs to
    pub fn main(&self) -> MainVersion {
        (self.major, self.minor)
    }

    pub fn main_format(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Stable means neither prerelease nor build metadata is present
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_empty() && self.build.is_empty()
    }

    /// Zero-padded rendering for column-aligned plan output
    pub fn fixed_width(&self) -> String {
        let mut s = format!("{}.{:02}.{:02}", self.major, self.minor, self.patch);
        if !self.prerelease.is_empty() {
            s.push('-');
            s.push_str(&self.prerelease);
        }
        if !self.build.is_empty() {
            s.push('+');
            s.push_str(&self.build);
        }
        s
    }
}

impl fmt::Display for PyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}
