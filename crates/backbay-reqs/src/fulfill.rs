//! Hypothetical reasoning without a live context: would a single fact, taken
//! as given, satisfy or rule out a requirement?

use std::collections::HashMap;

use backbay_ruleset::Ruleset;
use serde::{Deserialize, Serialize};

use crate::engine::ReqEngine;
use crate::requirement::Requirement;
use crate::universal::{Universal, UniversalKind};
use crate::vector::RequirementVector;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fulfillment {
    /// The candidate says nothing about this requirement.
    NotApplicable,
    /// Given the candidate, the requirement cannot be active.
    No,
    /// Given the candidate, the requirement is active.
    Yes,
}

/// Does the candidate make the requirement's universal hold? `None` when the
/// requirement examines something the candidate does not determine.
pub type FoundFn = fn(&Ruleset, &Universal, &Universal) -> Option<bool>;

/// Per candidate kind reasoners, built once and handed to the engine.
#[derive(Clone, Debug, Default)]
pub struct FulfillmentRegistry {
    found: HashMap<UniversalKind, FoundFn>,
}

impl FulfillmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: UniversalKind, found: FoundFn) {
        self.found.insert(kind, found);
    }

    pub fn get(&self, kind: UniversalKind) -> Option<FoundFn> {
        self.found.get(&kind).copied()
    }

    /// Reasoners for buildings, unit types and classes, terrains, extras,
    /// nations, and plain equality for the remaining entity kinds.
    pub fn standard() -> Self {
        use UniversalKind as K;
        let mut registry = Self::new();
        registry.register(K::Improvement, building_found);
        registry.register(K::UnitType, unit_type_found);
        registry.register(K::UnitClass, unit_class_found);
        registry.register(K::Terrain, terrain_found);
        registry.register(K::Extra, extra_found);
        registry.register(K::Nation, nation_found);
        for kind in [
            K::Advance,
            K::Government,
            K::Achievement,
            K::Good,
            K::Action,
            K::OutputType,
            K::Specialist,
            K::Activity,
            K::AiLevel,
            K::ServerSetting,
            K::VisionLayer,
            K::NationalIntel,
            K::CityStatus,
            K::UnitState,
            K::TopologyFlag,
        ] {
            registry.register(kind, same_kind_found);
        }
        registry
    }
}

fn same_kind_found(_: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    (target.kind() == candidate.kind()).then(|| target == candidate)
}

fn building_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::Improvement(building) = *candidate else {
        return None;
    };
    match *target {
        Universal::Improvement(b) => Some(b == building),
        Universal::ImprGenus(genus) => Some(rs.building_genus(building) == Some(genus)),
        _ => None,
    }
}

fn unit_type_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::UnitType(unit_type) = *candidate else {
        return None;
    };
    match *target {
        Universal::UnitType(t) => Some(t == unit_type),
        Universal::UnitTypeFlag(flag) => Some(rs.unit_type_has_flag(unit_type, flag)),
        Universal::UnitClass(class) => Some(rs.unit_class_of(unit_type) == Some(class)),
        Universal::UnitClassFlag(flag) => Some(rs.unit_type_class_has_flag(unit_type, flag)),
        _ => None,
    }
}

fn unit_class_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::UnitClass(class) = *candidate else {
        return None;
    };
    match *target {
        Universal::UnitClass(c) => Some(c == class),
        Universal::UnitClassFlag(flag) => Some(rs.unit_class_has_flag(class, flag)),
        _ => None,
    }
}

fn terrain_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::Terrain(terrain) = *candidate else {
        return None;
    };
    match *target {
        Universal::Terrain(t) => Some(t == terrain),
        Universal::TerrainClass(class) => Some(rs.terrain_class(terrain) == Some(class)),
        Universal::TerrainFlag(flag) => Some(rs.terrain_has_flag(terrain, flag)),
        Universal::TerrainAlter(alteration) => Some(rs.terrain_allows(terrain, alteration)),
        _ => None,
    }
}

fn extra_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::Extra(extra) = *candidate else {
        return None;
    };
    match *target {
        Universal::Extra(e) => Some(e == extra),
        Universal::ExtraFlag(flag) => Some(rs.extra_has_flag(extra, flag)),
        Universal::BaseFlag(flag) => Some(rs.extra_has_base_flag(extra, flag)),
        Universal::RoadFlag(flag) => Some(rs.extra_has_road_flag(extra, flag)),
        _ => None,
    }
}

fn nation_found(rs: &Ruleset, target: &Universal, candidate: &Universal) -> Option<bool> {
    let Universal::Nation(nation) = *candidate else {
        return None;
    };
    match *target {
        Universal::Nation(n) => Some(n == nation),
        Universal::NationGroup(group) => Some(rs.nation_in_group(nation, group)),
        _ => None,
    }
}

impl<'r> ReqEngine<'r> {
    /// Would `candidate`, taken as a fact, decide `req`?
    pub fn fulfills(&self, candidate: &Universal, req: &Requirement) -> Fulfillment {
        let Some(found) = self.registry().get(candidate.kind()) else {
            return Fulfillment::NotApplicable;
        };
        match found(self.ruleset(), &req.source, candidate) {
            None => Fulfillment::NotApplicable,
            Some(has) if has == req.present => Fulfillment::Yes,
            Some(_) => Fulfillment::No,
        }
    }

    /// Nothing in the vector rules the candidate out and, when
    /// `check_necessary` is set, some positive member is met by it.
    pub fn fulfills_vector(
        &self,
        candidate: &Universal,
        reqs: &RequirementVector,
        check_necessary: bool,
    ) -> bool {
        let mut necessary = false;
        for req in reqs {
            match self.fulfills(candidate, req) {
                Fulfillment::No => return false,
                Fulfillment::Yes if req.present => necessary = true,
                Fulfillment::Yes | Fulfillment::NotApplicable => {}
            }
        }
        !check_necessary || necessary
    }

    /// Does any member of the vector examine something the candidate
    /// determines?
    pub fn universal_relevant_to_vector(
        &self,
        candidate: &Universal,
        reqs: &RequirementVector,
    ) -> bool {
        reqs.iter()
            .any(|req| self.fulfills(candidate, req) != Fulfillment::NotApplicable)
    }
}
