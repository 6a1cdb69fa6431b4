pub mod client;
pub mod feed_env;
pub mod lint;
pub mod manifest;
pub mod source;
pub mod template;
pub mod version;

pub use feed_env::{FeedEnv, LoadedFeed};
pub use source::FeedSource;

/// A small but complete feed used across the unit tests, modeled on the
/// public arch1t3cht script repository.
#[cfg(test)]
pub(crate) const SAMPLE_FEED: &str = r##"{
    "dependencyControlFeedFormatVersion": "0.3.0",
    "name": "arch1t3cht's Aegisub Scripts",
    "description": "Main repository for arch1t3cht's automation macros.",
    "maintainer": "arch1t3cht",
    "knownFeeds": {
        "a-mo": "https://raw.githubusercontent.com/TypesettingTools/Aegisub-Motion/DepCtrl/DependencyControl.json",
        "l0": "https://raw.githubusercontent.com/TypesettingTools/line0-Aegisub-Scripts/master/DependencyControl.json"
    },
    "baseUrl": "https://github.com/arch1t3cht/Aegisub-Scripts",
    "url": "@{baseUrl}",
    "fileBaseUrl": "https://raw.githubusercontent.com/arch1t3cht/Aegisub-Scripts/@{channel}/",
    "macros": {
        "arch.AegisubChain": {
            "fileBaseUrl": "@{fileBaseUrl}macros/@{namespace}",
            "url": "@{baseUrl}#aegisubchain",
            "author": "arch1t3cht",
            "name": "AegisubChain",
            "description": "Compose chains of Aegisub macros into one.",
            "channels": {
                "release": {
                    "version": "0.4.0",
                    "released": "2022-03-12",
                    "default": true,
                    "files": [
                        {
                            "name": ".lua",
                            "url": "@{fileBaseUrl}@{fileName}",
                            "sha1": "2043461cdc1dd8e33ccb5d6f52b03f6e67b0fd6c"
                        }
                    ],
                    "requiredModules": [
                        {
                            "moduleName": "l0.DependencyControl",
                            "name": "DependencyControl",
                            "url": "https://github.com/TypesettingTools/DependencyControl",
                            "version": "0.6.1",
                            "feed": "https://raw.githubusercontent.com/TypesettingTools/DependencyControl/master/DependencyControl.json"
                        },
                        {
                            "moduleName": "arch.Util",
                            "name": "ArchUtil",
                            "version": "0.1.0"
                        }
                    ]
                }
            },
            "changelog": {
                "0.1.0": ["Initial release"],
                "0.3.0": ["Add dry-run mode", "Fix config path handling on Windows"],
                "0.4.0": ["Record configurations of scripts in chains"]
            }
        }
    },
    "modules": {
        "arch.Util": {
            "url": "@{baseUrl}",
            "author": "arch1t3cht",
            "name": "ArchUtil",
            "description": "Utility functions shared by arch1t3cht's scripts.",
            "channels": {
                "release": {
                    "version": "0.1.1",
                    "released": "2022-01-30",
                    "default": true,
                    "files": [
                        {
                            "name": ".moon",
                            "url": "@{fileBaseUrl}modules/@{namespacePath}@{fileName}",
                            "sha1": "b3a9c1f07c73dd1c9c1d04b2eb025b9180b22a2e"
                        }
                    ]
                }
            },
            "changelog": {
                "0.1.0": ["Initial release"],
                "0.1.1": ["Fix utf8 handling in string helpers"]
            }
        }
    }
}"##;
