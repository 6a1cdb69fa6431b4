use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A DependencyControl version string: one to three dot-separated numeric
/// components. Missing components count as zero, so `"1.2"` equals `"1.2.0"`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version string: {0:?}")]
pub struct ParseVersionError(pub String);

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(ParseVersionError(s.to_string()));
        }

        let mut components = [0u64; 3];
        for (ix, part) in parts.iter().enumerate() {
            components[ix] = part
                .parse::<u64>()
                .map_err(|_| ParseVersionError(s.to_string()))?;
        }

        Ok(Version {
            major: components[0],
            minor: components[1],
            patch: components[2],
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_versions() {
        assert_eq!("0.4.0".parse::<Version>().unwrap(), Version::new(0, 4, 0));
        assert_eq!(
            "12.34.56".parse::<Version>().unwrap(),
            Version::new(12, 34, 56)
        );
    }

    #[test]
    fn short_versions_are_zero_padded() {
        assert_eq!("1".parse::<Version>().unwrap(), Version::new(1, 0, 0));
        assert_eq!("1.2".parse::<Version>().unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("1.x.3".parse::<Version>().is_err());
        assert!("v1.2.3".parse::<Version>().is_err());
        assert!("1..3".parse::<Version>().is_err());
        assert!("-1.0.0".parse::<Version>().is_err());
    }

    #[test]
    fn orders_numerically() {
        let a: Version = "0.9.0".parse().unwrap();
        let b: Version = "0.10.0".parse().unwrap();
        let c: Version = "1.0.0".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
        assert_eq!(
            "1.2".parse::<Version>().unwrap(),
            "1.2.0".parse::<Version>().unwrap()
        );
    }

    #[test]
    fn displays_canonical_form() {
        assert_eq!("1.2".parse::<Version>().unwrap().to_string(), "1.2.0");
    }
}
