use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::error::{OntokitError, Result};

/// What a policy rule wants done with matching paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    /// Install only when the target does not exist yet (the default).
    IfMissing,
    /// Install regardless of an existing target.
    Always,
    /// Never install, protecting hand-edited or excluded files.
    Never,
}

/// The outcome for one candidate file write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallDecision {
    Install,
    Overwrite,
    Skip,
}

#[derive(Debug, Clone)]
struct PolicyRule {
    pattern: String,
    matcher: GlobMatcher,
    action: InstallAction,
}

/// An ordered list of (glob, action) rules; first match wins, unmatched
/// paths fall back to [`InstallAction::IfMissing`]. Pure and stateless
/// given the rule list, scoped to one installer invocation.
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    rules: Vec<PolicyRule>,
}

impl PolicySet {
    pub fn empty() -> Self {
        PolicySet::default()
    }

    pub fn new(rules: &[(&str, InstallAction)]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(pattern, action)| {
                let matcher = Glob::new(pattern)
                    .map_err(|e| OntokitError::GlobPattern {
                        pattern: pattern.to_string(),
                        source: e,
                    })?
                    .compile_matcher();
                Ok(PolicyRule {
                    pattern: pattern.to_string(),
                    matcher,
                    action: *action,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PolicySet { rules })
    }

    fn action_for(&self, relative_path: &Path) -> InstallAction {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(relative_path))
            .map(|rule| rule.action)
            .unwrap_or(InstallAction::IfMissing)
    }

    /// Decide whether the candidate write at `relative_path` proceeds.
    pub fn decide(&self, relative_path: &Path, target_exists: bool) -> InstallDecision {
        match (self.action_for(relative_path), target_exists) {
            (InstallAction::Never, _) => InstallDecision::Skip,
            (InstallAction::Always, true) => InstallDecision::Overwrite,
            (InstallAction::Always, false) => InstallDecision::Install,
            (InstallAction::IfMissing, true) => InstallDecision::Skip,
            (InstallAction::IfMissing, false) => InstallDecision::Install,
        }
    }

    /// The patterns in declaration order, for diagnostics.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.pattern.as_str())
    }
}
