//! Grammar of an import specifier: `<dir>/<module>[.<ext>]`.
//!
//! The rewriter, the resolver and the import checker all split specifiers
//! through this module so the three agree on what "the module" and "the
//! suffix" of a specifier are.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RECOGNIZED_SOURCE_SUFFIXES, Suffix};

static SPECIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<dir>(?:.*/)?)(?P<module>[^/]+?)(?:\.(?P<ext>jsx|js|tsx|ts|mjs|cjs))?$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifier<'a> {
    pub raw: &'a str,
    /// Everything up to and including the last `/`.
    pub dir: &'a str,
    /// Final segment without a recognized extension.
    pub module: &'a str,
    pub extension: Option<&'a str>,
}

impl<'a> Specifier<'a> {
    /// Returns `None` for empty specifiers and specifiers ending in `/`.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let caps = SPECIFIER_RE.captures(raw)?;
        Some(Self {
            raw,
            dir: caps.name("dir").map_or("", |m| m.as_str()),
            module: caps.name("module")?.as_str(),
            extension: caps.name("ext").map(|m| m.as_str()),
        })
    }

    pub fn has_recognized_extension(&self) -> bool {
        self.extension
            .is_some_and(|ext| RECOGNIZED_SOURCE_SUFFIXES.contains(&ext))
    }

    pub fn ends_with_suffix(&self, suffix: Suffix) -> bool {
        self.extension == Some(suffix.as_str())
    }

    pub fn with_suffix(&self, suffix: Suffix) -> String {
        format!("{}.{}", self.raw, suffix)
    }
}

/// Last `/`-separated segment, verbatim.
pub fn final_segment(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

pub fn is_relative(raw: &str) -> bool {
    raw.starts_with("./") || raw.starts_with("../")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_alias_specifier() {
        let s = Specifier::parse("@/hooks/useFoo").unwrap();
        assert_eq!(s.dir, "@/hooks/");
        assert_eq!(s.module, "useFoo");
        assert_eq!(s.extension, None);
        assert!(!s.has_recognized_extension());
    }

    #[test]
    fn picks_longest_extension() {
        let s = Specifier::parse("@/hooks/useFoo.jsx").unwrap();
        assert_eq!(s.module, "useFoo");
        assert_eq!(s.extension, Some("jsx"));
        assert!(s.ends_with_suffix(Suffix::Jsx));
        assert!(!s.ends_with_suffix(Suffix::Js));
    }

    #[test]
    fn unknown_extension_stays_in_module() {
        let s = Specifier::parse("./styles/theme.css").unwrap();
        assert_eq!(s.module, "theme.css");
        assert!(s.extension.is_none());
        assert!(is_relative(s.raw));
    }

    #[test]
    fn rejects_trailing_slash_and_empty() {
        assert!(Specifier::parse("@/hooks/").is_none());
        assert!(Specifier::parse("").is_none());
    }

    #[test]
    fn bare_package_has_no_dir() {
        let s = Specifier::parse("react").unwrap();
        assert_eq!(s.dir, "");
        assert_eq!(s.module, "react");
    }

    #[test]
    fn with_suffix_appends() {
        let s = Specifier::parse("@/hooks/useFoo").unwrap();
        assert_eq!(s.with_suffix(Suffix::Js), "@/hooks/useFoo.js");
        assert_eq!(final_segment("@/hooks/nested/useBar"), "useBar");
    }
}
