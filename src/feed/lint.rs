//! Static well-formedness checks for feed manifests.
//!
//! Lint never mutates and never fetches: it walks an already-parsed document
//! and reports everything a hand-editor can get wrong. Whether the artifacts
//! behind the URLs actually exist is the updater's problem, not ours.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::feed::feed_env::FeedEnv;
use crate::feed::manifest::{Channel, Feed, RecordKind, ScriptRecord};
use crate::feed::template::{self, expand, Scope};
use crate::feed::version::Version;

/// Format versions this tool knows how to interpret.
const SUPPORTED_FORMAT: Version = Version {
    major: 0,
    minor: 3,
    patch: 0,
};

const SHA1_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path into the document, e.g.
    /// `macros.arch.AegisubChain.channels.release.files[0].sha1`.
    pub target: String,
    pub message: String,
}

impl Diagnostic {
    fn error<T: Into<String>, M: Into<String>>(target: T, message: M) -> Self {
        Diagnostic {
            severity: Severity::Error,
            target: target.into(),
            message: message.into(),
        }
    }

    fn warning<T: Into<String>, M: Into<String>>(target: T, message: M) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.target, self.message)
    }
}

pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

pub fn warning_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.len() - error_count(diagnostics)
}

/// Lints a whole feed. When `env` is given, `requiredModules` entries may
/// also be satisfied by modules advertised in other loaded feeds.
pub fn lint_feed(feed: &Feed, env: Option<&FeedEnv>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    lint_header(feed, &mut diags);

    let scope = template::feed_scope(feed);
    if let Some(url) = &feed.url {
        if let Err(err) = expand(url, &scope) {
            diags.push(Diagnostic::error("url", err.to_string()));
        }
    }

    for (kind, namespace, record) in feed.records() {
        lint_record(feed, &scope, kind, namespace, record, env, &mut diags);
    }

    for namespace in feed.macros.keys() {
        if feed.modules.contains_key(namespace) {
            diags.push(Diagnostic::warning(
                format!("modules.{namespace}"),
                "namespace is advertised as both a macro and a module",
            ));
        }
    }

    diags
}

/// Lints a single record; `scope` is the feed-level template scope.
pub fn lint_record(
    feed: &Feed,
    scope: &Scope,
    kind: RecordKind,
    namespace: &str,
    record: &ScriptRecord,
    env: Option<&FeedEnv>,
    diags: &mut Vec<Diagnostic>,
) {
    let base = format!("{}.{namespace}", kind.key());
    let record_scope = template::record_scope(scope, namespace, record);

    match &record.url {
        Some(url) => {
            if let Err(err) = expand(url, &record_scope) {
                diags.push(Diagnostic::error(format!("{base}.url"), err.to_string()));
            }
        }
        None => diags.push(Diagnostic::warning(
            format!("{base}.url"),
            "record has no url",
        )),
    }

    if record.channels.is_empty() {
        diags.push(Diagnostic::warning(
            format!("{base}.channels"),
            "record has no channels",
        ));
    }

    let default_count = record
        .channels
        .values()
        .filter(|channel| channel.default)
        .count();
    if !record.channels.is_empty() && default_count == 0 {
        diags.push(Diagnostic::warning(
            format!("{base}.channels"),
            "no channel is marked as default",
        ));
    } else if default_count > 1 {
        diags.push(Diagnostic::error(
            format!("{base}.channels"),
            format!("{default_count} channels are marked as default"),
        ));
    }

    for (channel_name, channel) in &record.channels {
        lint_channel(
            feed,
            &record_scope,
            &base,
            channel_name,
            channel,
            env,
            diags,
        );
    }

    lint_changelog(&base, record, diags);
}

fn lint_channel(
    feed: &Feed,
    record_scope: &Scope,
    base: &str,
    channel_name: &str,
    channel: &Channel,
    env: Option<&FeedEnv>,
    diags: &mut Vec<Diagnostic>,
) {
    let ctarget = format!("{base}.channels.{channel_name}");

    if channel.version.is_empty() {
        diags.push(Diagnostic::error(
            format!("{ctarget}.version"),
            "channel has no version",
        ));
    } else if channel.version.parse::<Version>().is_err() {
        diags.push(Diagnostic::error(
            format!("{ctarget}.version"),
            format!("invalid version string: {:?}", channel.version),
        ));
    }

    if let Some(released) = &channel.released {
        if NaiveDate::parse_from_str(released, "%Y-%m-%d").is_err() {
            diags.push(Diagnostic::warning(
                format!("{ctarget}.released"),
                format!("release date {released:?} is not an ISO date"),
            ));
        }
    }

    let channel_scope = template::channel_scope(record_scope, channel_name, channel);

    for (ix, file) in channel.files.iter().enumerate() {
        let ftarget = format!("{ctarget}.files[{ix}]");

        if file.name.is_empty() {
            diags.push(Diagnostic::error(
                format!("{ftarget}.name"),
                "file has no name",
            ));
        }

        match file.url.as_deref() {
            None | Some("") => diags.push(Diagnostic::error(
                format!("{ftarget}.url"),
                "file has no url template",
            )),
            Some(url) => {
                let file_scope = template::file_scope(&channel_scope, file);
                match expand(url, &file_scope) {
                    Err(err) => diags.push(Diagnostic::error(
                        format!("{ftarget}.url"),
                        err.to_string(),
                    )),
                    Ok(resolved) => {
                        if !file.name.is_empty() && !resolved.contains(&file.name) {
                            diags.push(Diagnostic::warning(
                                format!("{ftarget}.url"),
                                format!("resolved url {resolved:?} does not reference the file name"),
                            ));
                        }
                    }
                }
            }
        }

        match file.sha1.as_deref() {
            None | Some("") => diags.push(Diagnostic::error(
                format!("{ftarget}.sha1"),
                "file has no checksum",
            )),
            Some(sha1) => {
                if sha1.len() != SHA1_LEN || !sha1.chars().all(|c| c.is_ascii_hexdigit()) {
                    diags.push(Diagnostic::error(
                        format!("{ftarget}.sha1"),
                        format!("{sha1:?} is not a sha1 checksum"),
                    ));
                }
            }
        }
    }

    for (ix, required) in channel.required_modules.iter().enumerate() {
        let rtarget = format!("{ctarget}.requiredModules[{ix}]");

        if required.module_name.is_empty() {
            diags.push(Diagnostic::error(
                format!("{rtarget}.moduleName"),
                "required module has no moduleName",
            ));
            continue;
        }

        let in_this_feed = feed.modules.contains_key(&required.module_name);
        let in_loaded_feeds =
            env.is_some_and(|env| env.find_module(&required.module_name).is_some());
        if !in_this_feed && !in_loaded_feeds && required.feed.is_none() {
            diags.push(Diagnostic::error(
                format!("{rtarget}.moduleName"),
                format!(
                    "{:?} is not in this feed's modules and no feed url is given",
                    required.module_name
                ),
            ));
        }

        if let Some(version) = &required.version {
            if version.parse::<Version>().is_err() {
                diags.push(Diagnostic::error(
                    format!("{rtarget}.version"),
                    format!("invalid version string: {version:?}"),
                ));
            }
        }

        if let Some(feed_url) = &required.feed {
            if !feed_url.starts_with("http://") && !feed_url.starts_with("https://") {
                diags.push(Diagnostic::warning(
                    format!("{rtarget}.feed"),
                    format!("{feed_url:?} is not an absolute http(s) url"),
                ));
            }
        }
    }
}

fn lint_changelog(base: &str, record: &ScriptRecord, diags: &mut Vec<Diagnostic>) {
    let mut prev: Option<(Version, &str)> = None;

    for key in record.changelog.keys() {
        let target = format!("{base}.changelog.{key}");
        match key.parse::<Version>() {
            Err(_) => diags.push(Diagnostic::error(
                target,
                format!("invalid version string: {key:?}"),
            )),
            Ok(version) => {
                if let Some((prev_version, prev_key)) = prev {
                    if version <= prev_version {
                        diags.push(Diagnostic::error(
                            target,
                            format!("changelog versions are not strictly increasing ({key} follows {prev_key})"),
                        ));
                    }
                }
                prev = Some((version, key));
            }
        }
    }
}

fn lint_header(feed: &Feed, diags: &mut Vec<Diagnostic>) {
    let raw = &feed.dependency_control_feed_format_version;
    if raw.is_empty() {
        diags.push(Diagnostic::error(
            "dependencyControlFeedFormatVersion",
            "feed does not declare a format version",
        ));
    } else {
        match raw.parse::<Version>() {
            Err(_) => diags.push(Diagnostic::error(
                "dependencyControlFeedFormatVersion",
                format!("invalid version string: {raw:?}"),
            )),
            Ok(version) => {
                if version > SUPPORTED_FORMAT {
                    diags.push(Diagnostic::warning(
                        "dependencyControlFeedFormatVersion",
                        format!("format {version} is newer than the supported {SUPPORTED_FORMAT}"),
                    ));
                }
            }
        }
    }

    if feed.name.is_empty() {
        diags.push(Diagnostic::warning("name", "feed has no name"));
    }
    if feed.maintainer.is_empty() {
        diags.push(Diagnostic::warning("maintainer", "feed has no maintainer"));
    }
    if feed.url.as_deref().unwrap_or_default().is_empty() {
        diags.push(Diagnostic::warning("url", "feed has no url"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;

    fn sample() -> Feed {
        SAMPLE_FEED.parse().unwrap()
    }

    fn targets_of(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().map(|d| d.target.as_str()).collect()
    }

    #[test]
    fn the_sample_feed_is_clean() {
        let diags = lint_feed(&sample(), None);
        assert_eq!(diags, Vec::new());
    }

    #[test]
    fn flags_a_missing_format_version() {
        let mut feed = sample();
        feed.dependency_control_feed_format_version.clear();
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert_eq!(targets_of(&diags), vec!["dependencyControlFeedFormatVersion"]);
    }

    #[test]
    fn warns_about_a_newer_format_version() {
        let mut feed = sample();
        feed.dependency_control_feed_format_version = "0.4.0".into();
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 0);
        assert_eq!(warning_count(&diags), 1);
    }

    #[test]
    fn flags_dangling_placeholders() {
        let mut feed = sample();
        feed.macros["arch.AegisubChain"].url = Some("@{baseUrl}/@{typo}".into());
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert_eq!(diags[0].target, "macros.arch.AegisubChain.url");
        assert!(diags[0].message.contains("@{typo}"));
    }

    #[test]
    fn flags_bad_checksums() {
        let mut feed = sample();
        feed.macros["arch.AegisubChain"].channels["release"].files[0].sha1 =
            Some("nothex".into());
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert_eq!(
            diags[0].target,
            "macros.arch.AegisubChain.channels.release.files[0].sha1"
        );
    }

    #[test]
    fn flags_missing_file_fields() {
        let mut feed = sample();
        {
            let file = &mut feed.macros["arch.AegisubChain"].channels["release"].files[0];
            file.name.clear();
            file.url = None;
            file.sha1 = None;
        }
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 3);
    }

    #[test]
    fn warns_when_the_url_ignores_the_file_name() {
        let mut feed = sample();
        feed.macros["arch.AegisubChain"].channels["release"].files[0].url =
            Some("@{fileBaseUrl}".into());
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 0);
        assert_eq!(warning_count(&diags), 1);
    }

    #[test]
    fn flags_unordered_changelogs() {
        let mut feed = sample();
        let record = &mut feed.macros["arch.AegisubChain"];
        record.changelog.insert("0.2.0".into(), vec!["Late entry".into()]);
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert!(diags[0].message.contains("0.2.0 follows 0.4.0"));
    }

    #[test]
    fn flags_invalid_changelog_keys() {
        let mut feed = sample();
        let record = &mut feed.macros["arch.AegisubChain"];
        record.changelog.insert("banana".into(), vec!["?".into()]);
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert!(diags[0].target.ends_with("changelog.banana"));
    }

    #[test]
    fn flags_multiple_default_channels() {
        let mut feed = sample();
        let record = &mut feed.macros["arch.AegisubChain"];
        let mut beta = Channel {
            version: "0.5.0".into(),
            default: true,
            ..Channel::default()
        };
        beta.files = record.channels["release"].files.clone();
        record.channels.insert("beta".into(), beta);
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert!(diags[0].message.contains("2 channels"));
    }

    #[test]
    fn flags_unresolvable_required_modules() {
        let mut feed = sample();
        feed.macros["arch.AegisubChain"].channels["release"].required_modules[1].module_name =
            "a.Missing".into();
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 1);
        assert!(diags[0].target.contains("requiredModules[1]"));
    }

    #[test]
    fn modules_in_other_loaded_feeds_satisfy_requirements() {
        let mut feed = sample();
        // Move the dependency out of this feed entirely.
        let util = feed.modules.shift_remove("arch.Util").unwrap();
        let mut other = Feed {
            name: "other".into(),
            dependency_control_feed_format_version: "0.3.0".into(),
            ..Feed::default()
        };
        other.modules.insert("arch.Util".into(), util);

        let without_env = lint_feed(&feed, None);
        assert_eq!(error_count(&without_env), 1);

        let env = FeedEnv::with_feeds(vec![other]);
        let with_env = lint_feed(&feed, Some(&env));
        assert_eq!(error_count(&with_env), 0);
    }

    #[test]
    fn warns_about_bad_release_dates() {
        let mut feed = sample();
        feed.modules["arch.Util"].channels["release"].released = Some("March 2022".into());
        let diags = lint_feed(&feed, None);
        assert_eq!(error_count(&diags), 0);
        assert_eq!(warning_count(&diags), 1);
    }
}
