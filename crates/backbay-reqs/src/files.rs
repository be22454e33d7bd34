//! Rule list, enabler and hard requirement files.
//!
//! Each file is YAML holding requirement entries in their textual form
//! ([`RawRequirement`]); compiling resolves names against a loaded ruleset.

use std::fs;
use std::path::Path;

use backbay_ruleset::Ruleset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enabler::{
    ActionEnabler, EnablerCollection, HardRequirement, HardRequirementTable, ReqSide,
};
use crate::requirement::{RawRequirement, ReqError, Requirement};
use crate::vector::RequirementVector;

#[derive(Debug, Error)]
pub enum RuleFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error("{owner}: unknown action '{action}'")]
    UnknownAction { owner: String, action: String },
    #[error("{owner}: {source}")]
    Requirement {
        owner: String,
        #[source]
        source: ReqError,
    },
}

fn read(path: &Path) -> Result<String, RuleFileError> {
    Ok(fs::read_to_string(path)?)
}

// ============================================================================
// RULE LISTS
// ============================================================================

/// A named requirement vector owned by some ruleset entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawRule {
    pub name: String,
    /// Disjunctive lists are only checked for legality.
    #[serde(default = "default_conjunctive")]
    pub conjunctive: bool,
    #[serde(default)]
    pub reqs: Vec<RawRequirement>,
}

fn default_conjunctive() -> bool {
    true
}

impl RawRule {
    /// Unresolvable entries become invalid markers so the sanity check
    /// disables the rule instead of loosening it.
    pub fn compile(&self, rs: &Ruleset) -> RequirementVector {
        RequirementVector::from_raw_lenient(rs, &self.name, &self.reqs)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

impl RuleFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RuleFileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }
}

// ============================================================================
// ENABLERS
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawEnabler {
    pub name: String,
    pub action: String,
    #[serde(default)]
    pub actor_reqs: Vec<RawRequirement>,
    #[serde(default)]
    pub target_reqs: Vec<RawRequirement>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnablerFile {
    #[serde(default)]
    pub enablers: Vec<RawEnabler>,
}

impl EnablerFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RuleFileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    pub fn compile(&self, rs: &Ruleset) -> Result<EnablerCollection, RuleFileError> {
        let mut collection = EnablerCollection::new();
        for raw in &self.enablers {
            let action = rs.actions.id_by_name(&raw.action).ok_or_else(|| {
                RuleFileError::UnknownAction {
                    owner: raw.name.clone(),
                    action: raw.action.clone(),
                }
            })?;
            let mut enabler = ActionEnabler::new(raw.name.clone(), action);
            enabler.actor_reqs =
                RequirementVector::from_raw_lenient(rs, &raw.name, &raw.actor_reqs);
            enabler.target_reqs =
                RequirementVector::from_raw_lenient(rs, &raw.name, &raw.target_reqs);
            enabler.disabled = raw.disabled;
            collection.add(enabler);
        }
        Ok(collection)
    }

    /// Textual form of a collection, e.g. after repair.
    pub fn from_collection(rs: &Ruleset, collection: &EnablerCollection) -> Self {
        let enablers = collection
            .iter()
            .map(|enabler| RawEnabler {
                name: enabler.name.clone(),
                action: rs
                    .actions
                    .rule_name(enabler.action)
                    .unwrap_or_default()
                    .to_string(),
                actor_reqs: enabler.actor_reqs.to_raw(rs),
                target_reqs: enabler.target_reqs.to_raw(rs),
                disabled: enabler.disabled,
            })
            .collect();
        Self { enablers }
    }

    pub fn to_yaml_string(&self) -> Result<String, RuleFileError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ============================================================================
// HARD REQUIREMENTS
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawHardRequirement {
    pub action: String,
    pub side: ReqSide,
    pub alternatives: Vec<RawRequirement>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HardRequirementFile {
    #[serde(default)]
    pub hard_requirements: Vec<RawHardRequirement>,
}

impl HardRequirementFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RuleFileError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    /// Hard requirements are engine input, not ruleset content: any entry
    /// that fails to resolve is an error.
    pub fn compile(&self, rs: &Ruleset) -> Result<HardRequirementTable, RuleFileError> {
        let mut table = HardRequirementTable::new();
        for raw in &self.hard_requirements {
            let action = rs.actions.id_by_name(&raw.action).ok_or_else(|| {
                RuleFileError::UnknownAction {
                    owner: raw.reason.clone(),
                    action: raw.action.clone(),
                }
            })?;
            let alternatives = raw
                .alternatives
                .iter()
                .map(|alt| Requirement::from_raw(rs, alt))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| RuleFileError::Requirement {
                    owner: raw.action.clone(),
                    source,
                })?;
            table.add(action, HardRequirement::new(raw.side, alternatives, raw.reason.clone()));
        }
        Ok(table)
    }
}
