use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Outcome of [`CheckRegistry::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    Proceed,
    /// Another environment already owns this config file.
    Skip { claimed_by: String },
}

/// Tracks which environment owns each tsconfig, so a config shared by
/// several environments is checked once.
///
/// The first environment to claim a path keeps it for the registry's
/// lifetime. Claiming again from the same environment succeeds, since a
/// chain hook may run more than once for one environment.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    claims: Mutex<FxHashMap<PathBuf, String>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, config_path: &Path, environment: &str) -> Claim {
        // Check and insert under one lock.
        let mut claims = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
        match claims.get(config_path) {
            Some(owner) if owner != environment => Claim::Skip {
                claimed_by: owner.clone(),
            },
            Some(_) => Claim::Proceed,
            None => {
                claims.insert(config_path.to_path_buf(), environment.to_string());
                Claim::Proceed
            }
        }
    }

    pub fn claimant(&self, config_path: &Path) -> Option<String> {
        self.claims
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(config_path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.claims
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
