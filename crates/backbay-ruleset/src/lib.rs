//! Ruleset entity catalog for Backbay Imperium rule evaluation.
//!
//! Rulesets are authored as YAML (see `data/base/`), compiled once into dense
//! id-indexed tables, and then only read.

pub mod catalog;
mod entities;
pub mod ids;
mod loader;
mod ruleset;
pub mod topology;

pub use crate::catalog::{Catalog, FlagNames, Named};
pub use crate::entities::*;
pub use crate::ids::*;
pub use crate::loader::{load_ruleset, RulesetError, RulesetSource};
pub use crate::ruleset::Ruleset;
pub use crate::topology::{Hex, MapGeometry, Topology, TopologyFlag};
