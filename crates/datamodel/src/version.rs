use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing a Kubernetes version string.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The version string was empty.
    Empty,
    /// The version string did not have exactly three dot-separated parts.
    WrongPartCount,
    /// A part of the version string was not an unsigned number.
    InvalidPart,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "version string must not be empty"),
            ParseError::WrongPartCount => {
                write!(f, "version must have exactly three parts (major.minor.patch)")
            }
            ParseError::InvalidPart => write!(f, "version parts must be unsigned numbers"),
        }
    }
}

impl Error for ParseError {}

/// A Kubernetes orchestrator version, compared numerically.
///
/// Version gates such as "at least 1.17.0" must go through this type rather
/// than string comparison: `"1.9.0"` sorts after `"1.17.0"` as a string but
/// is the older version.
///
/// # Examples
///
/// ```
/// use datamodel::KubernetesVersion;
///
/// let old: KubernetesVersion = "1.9.0".parse().unwrap();
/// let gate: KubernetesVersion = "1.17.0".parse().unwrap();
///
/// assert!(old < gate);
/// assert_eq!("1.9.0", old.to_string());
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct KubernetesVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl KubernetesVersion {
    /// Creates a version from its numeric parts.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        KubernetesVersion {
            major,
            minor,
            patch,
        }
    }

    /// The major version number.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor version number.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch version number.
    pub fn patch(&self) -> u64 {
        self.patch
    }
}

impl fmt::Display for KubernetesVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for KubernetesVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut parts = s.split('.');
        let mut next_part = || -> Result<u64, ParseError> {
            parts
                .next()
                .ok_or(ParseError::WrongPartCount)?
                .parse()
                .map_err(|_| ParseError::InvalidPart)
        };
        let version = KubernetesVersion {
            major: next_part()?,
            minor: next_part()?,
            patch: next_part()?,
        };
        match parts.next() {
            Some(_) => Err(ParseError::WrongPartCount),
            None => Ok(version),
        }
    }
}

/// Returns whether `version` is numerically greater than or equal to `gate`.
///
/// Both arguments are parsed before comparing, so `"1.9.0"` is correctly
/// ordered before `"1.17.0"`.
pub fn is_kubernetes_version_ge(version: &str, gate: &str) -> Result<bool, ParseError> {
    let version: KubernetesVersion = version.parse()?;
    let gate: KubernetesVersion = gate.parse()?;
    Ok(version >= gate)
}

#[cfg(test)]
mod test {
    use super::*;

    fn must_parse(version: &str) -> KubernetesVersion {
        version.parse().expect("could not parse version")
    }

    #[test]
    fn parses_parts() {
        let version = must_parse("1.15.7");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 15);
        assert_eq!(version.patch(), 7);
    }

    #[test]
    fn round_trips_through_display() {
        assert_eq!("1.18.2", must_parse("1.18.2").to_string());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!("".parse::<KubernetesVersion>().err(), Some(ParseError::Empty));
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert_eq!(
            "1.15".parse::<KubernetesVersion>().err(),
            Some(ParseError::WrongPartCount)
        );
        assert_eq!(
            "1.15.7.1".parse::<KubernetesVersion>().err(),
            Some(ParseError::WrongPartCount)
        );
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert_eq!(
            "1.x.7".parse::<KubernetesVersion>().err(),
            Some(ParseError::InvalidPart)
        );
        assert_eq!(
            "v1.15.7".parse::<KubernetesVersion>().err(),
            Some(ParseError::InvalidPart)
        );
    }

    #[test]
    fn orders_numerically_not_lexicographically() {
        // "1.9.0" > "1.17.0" as strings; the numeric order is the inverse.
        assert!("1.9.0" > "1.17.0");
        assert!(must_parse("1.9.0") < must_parse("1.17.0"));
    }

    #[test]
    fn version_gate_helper() {
        assert!(is_kubernetes_version_ge("1.17.7", "1.17.0").unwrap());
        assert!(is_kubernetes_version_ge("1.18.2", "1.17.0").unwrap());
        assert!(!is_kubernetes_version_ge("1.9.0", "1.17.0").unwrap());
        assert!(is_kubernetes_version_ge("bogus", "1.17.0").is_err());
    }
}
