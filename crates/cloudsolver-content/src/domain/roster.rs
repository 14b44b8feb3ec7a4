//! The NPC roster.

use std::collections::HashSet;

use cloudsolver_core::error::DomainError;
use serde::Deserialize;
use tracing::debug;

use super::npc::NpcProfile;

const BUILTIN_NPCS: &str = include_str!("../../data/npcs.yaml");

#[derive(Debug, Deserialize)]
struct RosterDocument {
    npcs: Vec<NpcProfile>,
}

/// Validated collection of NPC profiles, in declaration order.
#[derive(Debug, Clone)]
pub struct NpcRoster {
    npcs: Vec<NpcProfile>,
}

impl NpcRoster {
    /// The roster shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the embedded content is invalid.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_yaml(BUILTIN_NPCS)
    }

    /// Parses and validates a roster document of the form `npcs: [...]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML cannot be parsed, the
    /// roster is empty, an id repeats, or any profile fails validation.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let doc: RosterDocument = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("npc roster is not valid YAML: {e}")))?;
        Self::new(doc.npcs)
    }

    /// Builds a roster from profiles.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `npcs` is empty, an id repeats,
    /// or any profile fails validation.
    pub fn new(npcs: Vec<NpcProfile>) -> Result<Self, DomainError> {
        if npcs.is_empty() {
            return Err(DomainError::Validation("npc roster is empty".into()));
        }
        let mut seen = HashSet::new();
        for npc in &npcs {
            npc.validate()?;
            if !seen.insert(npc.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate npc id '{}'",
                    npc.id
                )));
            }
        }
        debug!(count = npcs.len(), "npc roster loaded");
        Ok(Self { npcs })
    }

    /// Looks up an NPC by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NpcProfile> {
        self.npcs.iter().find(|n| n.id == id)
    }

    /// Looks up an NPC by id, failing when it is unknown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown id.
    pub fn require(&self, id: &str) -> Result<&NpcProfile, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::NotFound(format!("npc '{id}'")))
    }

    /// All profiles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &NpcProfile> {
        self.npcs.iter()
    }

    /// Number of NPCs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Always false for a constructed roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}
