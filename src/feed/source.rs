use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where a feed manifest comes from: a file on disk or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Path(PathBuf),
    Url(String),
}

impl FromStr for FeedSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(FeedSource::Url(s.to_string()))
        } else {
            Ok(FeedSource::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Path(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            "https://example.com/DependencyControl.json"
                .parse::<FeedSource>()
                .unwrap(),
            FeedSource::Url("https://example.com/DependencyControl.json".to_string())
        );
        assert_eq!(
            "feeds/local.json".parse::<FeedSource>().unwrap(),
            FeedSource::Path(PathBuf::from("feeds/local.json"))
        );
    }
}
