use crate::error::{PublishError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Four dot-separated integer groups anywhere in a filename.
fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\.(\d+)\.(\d+)\.(\d+)").expect("embedded version pattern is valid")
    })
}

/// A whole string that is exactly `MAJOR.MINOR.PATCH.BUILD`.
fn strict_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)\.(\d+)$").expect("strict version pattern is valid")
    })
}

/// A `MAJOR.MINOR.PATCH.BUILD` version as carried by artifact filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64, build: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Release display name: the version without its build component.
    pub fn display_name(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// Leftmost four-group version embedded in `name`, if any.
    pub fn find_in(name: &str) -> Option<Self> {
        let captures = embedded_pattern().captures(name)?;
        Self::from_captures(&captures)
    }

    fn from_captures(captures: &regex::Captures<'_>) -> Option<Self> {
        let group = |i: usize| captures.get(i)?.as_str().parse::<u64>().ok();
        Some(Self::new(group(1)?, group(2)?, group(3)?, group(4)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

impl FromStr for Version {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        strict_pattern()
            .captures(s)
            .and_then(|captures| Self::from_captures(&captures))
            .ok_or_else(|| PublishError::MalformedVersion {
                input: s.to_string(),
            })
    }
}

/// Derive the `MAJOR.MINOR.PATCH` release name from a full tag name.
///
/// Anything other than exactly four integer components is rejected rather
/// than truncated.
pub fn release_name(tag_name: &str) -> Result<String> {
    tag_name.parse::<Version>().map(|v| v.display_name())
}

/// Filenames that never carry the release version (e.g. packed libraries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarFilter {
    suffixes: Vec<String>,
}

impl SidecarFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_sidecar(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Filenames from `names` that take part in version resolution.
    pub fn candidates<'a, I>(&self, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|name| !self.is_sidecar(name))
            .collect()
    }
}

impl Default for SidecarFilter {
    fn default() -> Self {
        Self::new([".lvlibp"])
    }
}

/// Resolve the single version shared by all candidate filenames.
///
/// Names without an embedded version are ignored. Zero or several distinct
/// versions is an error carrying everything that was found.
pub fn resolve_version<'a, I>(candidates: I) -> Result<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    let found: BTreeSet<Version> = candidates
        .into_iter()
        .filter_map(|name| {
            let version = Version::find_in(name);
            if let Some(v) = &version {
                tracing::debug!("{} carries version {}", name, v);
            }
            version
        })
        .collect();

    if found.len() == 1 {
        if let Some(version) = found.first() {
            return Ok(*version);
        }
    }

    Err(PublishError::VersionAmbiguity {
        found: found.into_iter().collect(),
    })
}
