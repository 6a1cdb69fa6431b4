use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(
    Debug, Default, Display, Clone, EnumIter, PartialEq, Eq, Sequence, Serialize, Deserialize,
)]
pub enum Scope {
    #[default]
    All,
    Macros,
    Modules,
}

#[derive(Debug, Default, Clone, EnumIter, PartialEq, Eq, Sequence, Serialize, Deserialize)]
pub enum Sort {
    #[default]
    Name,
    Namespace,
    Author,
    Released,
    Version,
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            Sort::Name => "Name",
            Sort::Namespace => "Namespace",
            Sort::Author => "Author",
            Sort::Released => "Recently Released",
            Sort::Version => "Version",
        };
        write!(f, "{}", output)
    }
}

#[derive(Debug, Default)]
pub struct SearchOptions {
    pub term: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub sort: Sort,
    pub scope: Scope,
}
