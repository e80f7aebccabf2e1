//! Candidate universe plus the ids associated with the current account.
//!
//! Pool files are JSON or YAML, selected by extension:
//!
//! ```yaml
//! candidates:
//!   - id: PolicyEnforcementService.GLB
//!     label: PolicyEnforcementService.GLB
//! associated:
//!   - athenz.zms
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use combobox_types::{CandidateSet, Choice, MatchPolicy};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::matches;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    #[serde(rename = "candidates")]
    universe: CandidateSet,
    /// Ids offered when the widget is restricted to the known set.
    #[serde(default)]
    associated: IndexSet<String>,
}

impl CandidatePool {
    pub fn new(universe: CandidateSet) -> Self {
        Self {
            universe,
            associated: IndexSet::new(),
        }
    }

    /// A pool where every candidate counts as associated, for hosts that
    /// only ever supply the known set.
    pub fn all_known(universe: CandidateSet) -> Self {
        let associated = universe.iter().map(|choice| choice.id.clone()).collect();
        Self { universe, associated }
    }

    /// Mark ids as associated with the current account. Unknown ids are ignored
    /// when computing the visible set.
    pub fn with_associated<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.associated.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn universe(&self) -> &CandidateSet {
        &self.universe
    }

    pub fn is_associated(&self, id: &str) -> bool {
        self.associated.contains(id)
    }

    /// Candidates offered under the given restriction, in universe order.
    pub fn visible(&self, restrict_to_known_set: bool) -> CandidateSet {
        if !restrict_to_known_set {
            return self.universe.clone();
        }
        self.universe
            .iter()
            .filter(|choice| self.associated.contains(&choice.id))
            .cloned()
            .collect()
    }

    /// A copy holding only the candidates whose label matches `query`.
    /// Association marks are carried over for the remaining ids.
    pub fn narrowed(&self, query: &str, policy: MatchPolicy) -> CandidatePool {
        let universe: CandidateSet = self
            .universe
            .iter()
            .filter(|choice| matches(&choice.label, query, policy))
            .cloned()
            .collect();
        let associated = self
            .associated
            .iter()
            .filter(|id| universe.get(id.as_str()).is_some())
            .cloned()
            .collect();
        CandidatePool { universe, associated }
    }
}

impl From<Vec<Choice>> for CandidatePool {
    fn from(choices: Vec<Choice>) -> Self {
        Self::new(choices.into())
    }
}

/// Read a pool file, picking YAML for `.yaml`/`.yml` and JSON otherwise.
pub fn load_pool(path: &Path) -> Result<CandidatePool> {
    let data = fs::read_to_string(path).with_context(|| format!("reading candidate pool {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let pool: CandidatePool = if is_yaml {
        serde_yaml::from_str(&data).with_context(|| format!("parsing YAML pool {}", path.display()))?
    } else {
        serde_json::from_str(&data).with_context(|| format!("parsing JSON pool {}", path.display()))?
    };
    debug!(
        path = %path.display(),
        candidate_count = pool.universe.len(),
        associated_count = pool.associated.len(),
        "candidate pool loaded"
    );
    Ok(pool)
}
