//! Canonical identities for teams and venues.
//!
//! Each provider spells names its own way. An [IdentityMap] translates a provider's spelling into
//! a canonical identity key; names it has never seen pass through unchanged so that reconciliation
//! can always proceed.

use std::io;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::file::ReadJsonFile;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityMap {
    keys: FxHashMap<String, String>,
}
impl IdentityMap {
    pub fn insert(&mut self, name: impl Into<String>, key: impl Into<String>) -> Option<String> {
        self.keys.insert(name.into(), key.into())
    }

    /// Looks up `name` without reporting a miss.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    /// Maps `name` to its identity key, falling back to `name` itself if it is unmapped.
    pub fn map_identity(&self, name: &str) -> String {
        match self.resolve(name) {
            Some(key) => key.to_string(),
            None => {
                warn!("unmapped identity {name:?}");
                name.to_string()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IdentityMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let keys = iter
            .into_iter()
            .map(|(name, key)| (name.into(), key.into()))
            .collect();
        Self { keys }
    }
}

/// The identity maps of a single league.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityTables {
    pub teams: IdentityMap,
    pub venues: IdentityMap,
}
impl IdentityTables {
    pub fn read_json_files(
        teams: impl AsRef<Path>,
        venues: impl AsRef<Path>,
    ) -> Result<Self, IdentityError> {
        Ok(Self {
            teams: IdentityMap::read_json_file(teams)?,
            venues: IdentityMap::read_json_file(venues)?,
        })
    }

    pub fn afl() -> Result<Self, IdentityError> {
        Ok(Self {
            teams: serde_json::from_str(include_str!("../data/afl_teams.json"))?,
            venues: serde_json::from_str(include_str!("../data/afl_venues.json"))?,
        })
    }
}
