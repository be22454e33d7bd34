//! Requirement engine for Backbay Imperium rulesets.
//!
//! Rules gate effects, buildings, units and actions behind vectors of
//! requirements. This crate evaluates those vectors against a partially known
//! game context, detects requirements that can never hold together, checks
//! rule vectors at load time, reasons about hypothetical facts, repairs action
//! enablers that miss hard requirements, and renders help text.

pub mod config;
pub mod context;
mod contradiction;
pub mod diplrel;
pub mod enabler;
mod engine;
pub mod eval;
pub mod files;
mod fulfill;
pub mod range;
pub mod requirement;
pub mod sanity;
pub mod text;
pub mod universal;
pub mod vector;
pub mod world;

pub use crate::config::{EngineConfig, EngineConfigError, SanityPolicy};
pub use crate::context::ReqContext;
pub use crate::contradiction::is_req_in_vector;
pub use crate::enabler::{
    ActionEnabler, EnablerCollection, HardRequirement, HardRequirementTable, RepairReport,
    RepairSuggestion, ReqSide,
};
pub use crate::engine::ReqEngine;
pub use crate::eval::{ProblemType, TriState};
pub use crate::files::{EnablerFile, HardRequirementFile, RuleFile, RuleFileError};
pub use crate::fulfill::{FoundFn, Fulfillment, FulfillmentRegistry};
pub use crate::range::ReqRange;
pub use crate::requirement::{NumericRequirement, RawRequirement, ReqError, Requirement};
pub use crate::sanity::{RuleStatus, RulesetRejected, SanityProblem};
pub use crate::text::{req_text, vector_text, Verbosity};
pub use crate::universal::{Universal, UniversalKind};
pub use crate::vector::RequirementVector;
pub use crate::world::GameWorld;

#[cfg(test)]
pub(crate) mod test_support {
    use backbay_ruleset::{
        load_ruleset, EntityId, MapGeometry, PlayerId, Ruleset, RulesetSource, TeamId, TileIndex,
        Topology,
    };

    use crate::universal::Activity;
    use crate::world::{City, CityFlags, GameInfo, GameMap, GameWorld, Player, Unit};

    /// Centre of the first city, (3, 3) on the 10x10 test map.
    pub const CITY_TILE: TileIndex = TileIndex(33);
    const PARTNER_TILE: TileIndex = TileIndex(77);

    pub fn ruleset() -> Ruleset {
        load_ruleset(RulesetSource::Embedded).expect("embedded ruleset loads")
    }

    fn player(rs: &Ruleset, id: u8, nation: &str, government: &str) -> Player {
        Player {
            id: PlayerId(id),
            nation: rs.nations.id_by_name(nation).expect("nation"),
            team: TeamId(id),
            government: rs.governments.id_by_name(government).expect("government"),
            ai_level: None,
            is_alive: true,
            known_techs: Vec::new(),
            achievements: Vec::new(),
            culture: 0,
            birth_turn: 0,
            diplomacy: Vec::new(),
            ever_built: Vec::new(),
        }
    }

    fn city(id: u32, owner: PlayerId, tile: TileIndex) -> City {
        City {
            id: EntityId::new(id, 0),
            name: format!("City {id}"),
            owner,
            original_owner: owner,
            tile,
            size: 3,
            radius_sq: 5,
            buildings: Vec::new(),
            trade_partners: Vec::new(),
            goods: Vec::new(),
            citizens: Default::default(),
            culture: 0,
            founded_turn: 0,
            status: CityFlags::default(),
            specialists: Default::default(),
        }
    }

    /// Grassland 10x10 map, one continent. A Roman monarchy with a city and
    /// a Warriors unit at [`CITY_TILE`], and a Greek despotism with a city
    /// far away. No diplomacy, no history, turn 0.
    pub fn small_world(rs: &Ruleset) -> GameWorld {
        let grassland = rs.terrains.id_by_name("Grassland").expect("grassland");
        let geometry = MapGeometry::new(10, 10, Topology::empty());
        let mut world = GameWorld::new(GameInfo::default(), GameMap::filled(geometry, grassland));

        world.players.push(player(rs, 0, "Roman", "Monarchy"));
        world.players.push(player(rs, 1, "Greek", "Despotism"));

        for (index, owner, tile) in [(0, PlayerId(0), CITY_TILE), (1, PlayerId(1), PARTNER_TILE)] {
            let city = city(index, owner, tile);
            if let Some(t) = world.map.tile_mut(tile) {
                t.city_center = Some(city.id);
                t.owner = Some(owner);
            }
            world.cities.push(city);
        }

        let warriors = rs.unit_types.id_by_name("Warriors").expect("warriors");
        let unit = Unit {
            id: EntityId::new(0, 0),
            owner: PlayerId(0),
            unit_type: warriors,
            veteran: 0,
            moves_left: 1,
            hp: 10,
            activity: Activity::Idle,
            tile: CITY_TILE,
            homecity: None,
            transported_by: None,
            transporting: Vec::new(),
            birth_turn: 0,
        };
        if let Some(t) = world.map.tile_mut(CITY_TILE) {
            t.units.push(unit.id);
        }
        world.units.push(unit);
        world
    }
}
