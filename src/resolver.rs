//! Build-time resolver hook for extension-less alias imports.
//!
//! A bundler calls [`ResolveHook::resolve_id`] for every specifier. Anything
//! outside the hooks alias, or already carrying a suffix, is declined so the
//! default resolver handles it. For the rest the resolver probes a fixed
//! two-step plan and returns the first file that exists.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::context::ProjectContext;
use crate::rules::{Specifier, Suffix};

pub const PLUGIN_NAME: &str = "extguard:hooks-extension";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decline {
    /// Not under the hooks alias.
    NotAliased,
    /// Already ends in a recognized source suffix.
    AlreadyExplicit,
    /// No suffix in the plan matched a file.
    Unresolved,
    /// The bounded lookup ran out of time.
    TimedOut,
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decline::NotAliased => "specifier is outside the hooks alias",
            Decline::AlreadyExplicit => "specifier already has an explicit suffix",
            Decline::Unresolved => "no candidate file exists",
            Decline::TimedOut => "lookup timed out",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(PathBuf),
    Declined(Decline),
}

impl Resolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved(p) => Some(p),
            Resolution::Declined(_) => None,
        }
    }
}

/// Existence check used by the resolver.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn is_file(&self, path: &Path) -> bool;
}

pub struct FsProbe;

#[async_trait]
impl Probe for FsProbe {
    async fn is_file(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}

/// A resolver hook as bundlers see it.
#[async_trait]
pub trait ResolveHook: Send + Sync {
    fn name(&self) -> &str;

    async fn resolve_id(&self, specifier: &str, importer: Option<&Path>) -> Resolution;
}

/// The suffixes to try, in order. Always exactly two entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePlan([Suffix; 2]);

impl ProbePlan {
    pub fn suffixes(&self) -> [Suffix; 2] {
        self.0
    }
}

pub struct HooksResolver<P = FsProbe> {
    ctx: Arc<ProjectContext>,
    probe: P,
}

impl HooksResolver<FsProbe> {
    pub fn new(ctx: Arc<ProjectContext>) -> Self {
        Self::with_probe(ctx, FsProbe)
    }
}

impl<P: Probe> HooksResolver<P> {
    pub fn with_probe(ctx: Arc<ProjectContext>, probe: P) -> Self {
        Self { ctx, probe }
    }

    /// Configured order, except that a module pinned by the rule table has
    /// its own suffix tried first.
    pub fn plan_for(&self, specifier: &str) -> ProbePlan {
        let [primary, secondary] = self.ctx.config.probe_order();
        match self.ctx.rules.lookup(specifier) {
            Some(rule) if rule.required_suffix != primary => {
                ProbePlan([rule.required_suffix, rule.required_suffix.other()])
            }
            _ => ProbePlan([primary, secondary]),
        }
    }

    /// `@/hooks/useFoo` -> `<root>/resources/js/hooks/useFoo`
    fn expand_alias(&self, specifier: &str) -> Option<PathBuf> {
        let rest = specifier.strip_prefix(&self.ctx.config.alias_prefix())?;
        Some(self.ctx.source_root().join(rest))
    }

    /// [`ResolveHook::resolve_id`] bounded by `limit`.
    pub async fn resolve_within(
        &self,
        specifier: &str,
        importer: Option<&Path>,
        limit: Duration,
    ) -> Resolution {
        match tokio::time::timeout(limit, self.resolve_id(specifier, importer)).await {
            Ok(resolution) => resolution,
            Err(_) => {
                debug!(specifier, ?limit, "resolution timed out");
                Resolution::Declined(Decline::TimedOut)
            }
        }
    }
}

#[async_trait]
impl<P: Probe> ResolveHook for HooksResolver<P> {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn resolve_id(&self, specifier: &str, importer: Option<&Path>) -> Resolution {
        if !specifier.starts_with(&self.ctx.config.hooks_prefix()) {
            return Resolution::Declined(Decline::NotAliased);
        }
        if Specifier::parse(specifier).is_some_and(|s| s.has_recognized_extension()) {
            return Resolution::Declined(Decline::AlreadyExplicit);
        }
        let Some(base) = self.expand_alias(specifier) else {
            return Resolution::Declined(Decline::NotAliased);
        };

        for suffix in self.plan_for(specifier).suffixes() {
            let mut candidate = base.clone().into_os_string();
            candidate.push(".");
            candidate.push(suffix.as_str());
            let candidate = PathBuf::from(candidate);

            trace!(candidate = %candidate.display(), "probing");
            if self.probe.is_file(&candidate).await {
                debug!(specifier, resolved = %candidate.display(), "resolved");
                return Resolution::Resolved(candidate);
            }
        }

        debug!(
            specifier,
            importer = ?importer.map(Path::display),
            "no candidate matched, deferring to default resolver"
        );
        Resolution::Declined(Decline::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtguardConfig;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn project(hooks: &[&str]) -> (TempDir, Arc<ProjectContext>) {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("resources/js/hooks");
        fs::create_dir_all(&dir).unwrap();
        for name in hooks {
            fs::write(dir.join(name), "export const x = 1;\n").unwrap();
        }
        let ctx = ProjectContext::new(temp.path(), ExtguardConfig::default()).unwrap();
        (temp, Arc::new(ctx))
    }

    #[tokio::test]
    async fn picks_js_when_only_js_exists() {
        let (temp, ctx) = project(&["useFoo.js"]);
        let resolver = HooksResolver::new(ctx);
        let got = resolver.resolve_id("@/hooks/useFoo", None).await;
        assert_eq!(
            got.path(),
            Some(temp.path().join("resources/js/hooks/useFoo.js").as_path())
        );
    }

    #[tokio::test]
    async fn picks_jsx_when_only_jsx_exists() {
        let (temp, ctx) = project(&["useFoo.jsx"]);
        let resolver = HooksResolver::new(ctx);
        let got = resolver.resolve_id("@/hooks/useFoo", None).await;
        assert_eq!(
            got.path(),
            Some(temp.path().join("resources/js/hooks/useFoo.jsx").as_path())
        );
    }

    #[tokio::test]
    async fn declines_outside_alias_and_explicit() {
        let (_temp, ctx) = project(&["useFoo.js"]);
        let resolver = HooksResolver::new(ctx);
        assert_eq!(
            resolver.resolve_id("react", None).await,
            Resolution::Declined(Decline::NotAliased)
        );
        assert_eq!(
            resolver.resolve_id("./useFoo", None).await,
            Resolution::Declined(Decline::NotAliased)
        );
        assert_eq!(
            resolver.resolve_id("@/hooks/useFoo.js", None).await,
            Resolution::Declined(Decline::AlreadyExplicit)
        );
    }

    #[tokio::test]
    async fn missing_module_is_declined() {
        let (_temp, ctx) = project(&[]);
        let resolver = HooksResolver::new(ctx);
        let importer = Path::new("resources/js/App.jsx");
        let got = resolver.resolve_id("@/hooks/useMissing", Some(importer)).await;
        assert_eq!(got, Resolution::Declined(Decline::Unresolved));
        assert!(got.path().is_none());
    }

    struct RecordingProbe(Mutex<Vec<PathBuf>>);

    #[async_trait]
    impl Probe for RecordingProbe {
        async fn is_file(&self, path: &Path) -> bool {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(path.to_path_buf());
            }
            false
        }
    }

    #[tokio::test]
    async fn probes_at_most_two_candidates() {
        let (_temp, ctx) = project(&[]);
        let resolver = HooksResolver::with_probe(ctx, RecordingProbe(Mutex::new(Vec::new())));
        resolver.resolve_id("@/hooks/deep/useThing", None).await;

        let seen = resolver.probe.0.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].ends_with("hooks/deep/useThing.js"));
        assert!(seen[1].ends_with("hooks/deep/useThing.jsx"));
    }

    #[tokio::test]
    async fn pinned_suffix_is_probed_first() {
        let (_temp, ctx) = project(&["useModal.jsx"]);
        let resolver = HooksResolver::new(ctx);
        assert_eq!(
            resolver.plan_for("@/hooks/useModal").suffixes(),
            [Suffix::Jsx, Suffix::Js]
        );
        assert_eq!(
            resolver.plan_for("@/hooks/useOther").suffixes(),
            [Suffix::Js, Suffix::Jsx]
        );
    }

    #[tokio::test]
    async fn literal_hook_present_only_as_jsx_still_resolves() {
        let (temp, ctx) = project(&["useAnalyticsData.jsx"]);
        let resolver = HooksResolver::new(ctx);
        let got = resolver.resolve_id("@/hooks/useAnalyticsData", None).await;
        assert_eq!(
            got.path(),
            Some(temp.path().join("resources/js/hooks/useAnalyticsData.jsx").as_path())
        );
    }

    #[tokio::test]
    async fn both_suffixes_on_disk_resolve_to_js() {
        let (temp, ctx) = project(&["useFoo.js", "useFoo.jsx"]);
        let resolver = HooksResolver::new(ctx);
        let got = resolver.resolve_id("@/hooks/useFoo", None).await;
        assert_eq!(
            got.path(),
            Some(temp.path().join("resources/js/hooks/useFoo.js").as_path())
        );
    }

    struct SlowProbe;

    #[async_trait]
    impl Probe for SlowProbe {
        async fn is_file(&self, _path: &Path) -> bool {
            tokio::time::sleep(Duration::from_secs(5)).await;
            true
        }
    }

    #[tokio::test]
    async fn bounded_lookup_times_out() {
        let (_temp, ctx) = project(&[]);
        let resolver = HooksResolver::with_probe(ctx, SlowProbe);
        let got = resolver
            .resolve_within("@/hooks/useFoo", None, Duration::from_millis(20))
            .await;
        assert_eq!(got, Resolution::Declined(Decline::TimedOut));
    }

    #[tokio::test]
    async fn concurrent_lookups_share_one_context() {
        let (_temp, ctx) = project(&["useA.js", "useB.jsx"]);
        let resolver = Arc::new(HooksResolver::new(ctx));
        assert_eq!(resolver.name(), PLUGIN_NAME);

        let handles: Vec<_> = ["@/hooks/useA", "@/hooks/useB", "@/hooks/useA", "react"]
            .into_iter()
            .map(|spec| {
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move { resolver.resolve_id(spec, None).await })
            })
            .collect();

        let mut results = Vec::new();
        for h in handles {
            results.push(h.await.unwrap());
        }
        assert!(results[0].path().unwrap().ends_with("useA.js"));
        assert!(results[1].path().unwrap().ends_with("useB.jsx"));
        assert_eq!(results[0], results[2]);
        assert_eq!(results[3], Resolution::Declined(Decline::NotAliased));
    }
}
