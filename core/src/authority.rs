use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Static per-document weight standing in for external backlinks.
///
/// Keyed by external document id. Unknown ids weigh 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorityTable {
    weights: HashMap<String, u32>,
}

impl AuthorityTable {
    pub fn new() -> Self { Self::default() }

    /// Simulated backlink counts for the bundled sample pages.
    pub fn builtin() -> Self {
        [
            ("healthy-recipes.html", 10u32),
            ("quick-meals.html", 2),
            ("fitness-guide.html", 5),
            ("about-us.html", 1),
        ]
        .into_iter()
        .collect()
    }

    /// Load a JSON object of `{ "<id>": <weight> }`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening authority table {}", path.display()))?;
        let table = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing authority table {}", path.display()))?;
        Ok(table)
    }

    pub fn set(&mut self, id: impl Into<String>, weight: u32) {
        self.weights.insert(id.into(), weight);
    }

    pub fn weight(&self, id: &str) -> u32 {
        self.weights.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }
}

impl<S: Into<String>> FromIterator<(S, u32)> for AuthorityTable {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self { weights: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}
