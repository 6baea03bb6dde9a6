pub mod specifier;
pub mod table;

pub use specifier::Specifier;
pub use table::{PathRule, RuleTable, RuleTableBuilder};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source suffixes that make a specifier "already explicit".
pub const RECOGNIZED_SOURCE_SUFFIXES: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

/// A suffix a module can be pinned to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Suffix {
    Js,
    Jsx,
}

impl Suffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Suffix::Js => "js",
            Suffix::Jsx => "jsx",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(Suffix::Js),
            "jsx" => Some(Suffix::Jsx),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Suffix::Js => Suffix::Jsx,
            Suffix::Jsx => Suffix::Js,
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
