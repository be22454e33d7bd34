#![allow(dead_code)]

use backbay_reqs::universal::Activity;
use backbay_reqs::world::{City, CityFlags, GameInfo, GameMap, GameWorld, Player, Unit};
use backbay_reqs::{Requirement, ReqRange, Universal, UniversalKind};
use backbay_ruleset::{
    load_ruleset, EntityId, MapGeometry, PlayerId, Ruleset, RulesetSource, TeamId, TileIndex,
    Topology,
};

pub const HOME: TileIndex = TileIndex(12);

pub fn ruleset() -> Ruleset {
    load_ruleset(RulesetSource::Embedded).expect("embedded ruleset")
}

pub fn req(
    rs: &Ruleset,
    kind: UniversalKind,
    name: &str,
    range: ReqRange,
    present: bool,
) -> Requirement {
    let source = Universal::from_rule_name(kind, name, rs);
    assert!(!source.is_invalid(), "{kind} '{name}' not in the base ruleset");
    Requirement::new(source, range, present)
}

/// Two players on an 8x8 grassland map; player 0 has one city at [`HOME`]
/// with a Legion inside.
pub fn world(rs: &Ruleset) -> GameWorld {
    let grassland = rs.terrains.id_by_name("Grassland").unwrap();
    let geometry = MapGeometry::new(8, 8, Topology::empty());
    let mut world = GameWorld::new(GameInfo::default(), GameMap::filled(geometry, grassland));

    for (id, nation, government) in [(0, "Babylonian", "Despotism"), (1, "Zulu", "Despotism")] {
        world.players.push(Player {
            id: PlayerId(id),
            nation: rs.nations.id_by_name(nation).unwrap(),
            team: TeamId(id),
            government: rs.governments.id_by_name(government).unwrap(),
            ai_level: None,
            is_alive: true,
            known_techs: Vec::new(),
            achievements: Vec::new(),
            culture: 0,
            birth_turn: 0,
            diplomacy: Vec::new(),
            ever_built: Vec::new(),
        });
    }

    let city = City {
        id: EntityId::new(0, 0),
        name: "Babylon".into(),
        owner: PlayerId(0),
        original_owner: PlayerId(0),
        tile: HOME,
        size: 4,
        radius_sq: 5,
        buildings: Vec::new(),
        trade_partners: Vec::new(),
        goods: Vec::new(),
        citizens: Default::default(),
        culture: 0,
        founded_turn: 0,
        status: CityFlags::default(),
        specialists: Default::default(),
    };
    let unit = Unit {
        id: EntityId::new(0, 0),
        owner: PlayerId(0),
        unit_type: rs.unit_types.id_by_name("Legion").unwrap(),
        veteran: 0,
        moves_left: 1,
        hp: 10,
        activity: Activity::Idle,
        tile: HOME,
        homecity: Some(city.id),
        transported_by: None,
        transporting: Vec::new(),
        birth_turn: 0,
    };
    let tile = world.map.tile_mut(HOME).unwrap();
    tile.city_center = Some(city.id);
    tile.owner = Some(PlayerId(0));
    tile.units.push(unit.id);
    world.cities.push(city);
    world.units.push(unit);
    world
}
