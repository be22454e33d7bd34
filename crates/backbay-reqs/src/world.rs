//! Read-only snapshot of game state that evaluation contexts borrow from.
//!
//! The host owns and updates these structures; the engine only queries them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use backbay_ruleset::{
    AchievementId, BuildingId, CityId, ContinentId, ExtraId, GoodId, GovernmentId, MapGeometry,
    NationId, PlayerId, Ruleset, ServerSettingId, SpecialistId, TeamId, TechId, TerrainId,
    TileIndex, UnitId, UnitTypeId,
};

use crate::range::ReqRange;
use crate::universal::{Activity, AiLevel, DiplRel};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameInfo {
    pub turn: i32,
    pub year: i32,
    #[serde(default)]
    pub calendar_fragment: i32,
    /// Server settings changed from their ruleset default.
    #[serde(default)]
    pub settings: BTreeMap<ServerSettingId, bool>,
}

impl GameInfo {
    pub fn setting_enabled(&self, rs: &Ruleset, setting: ServerSettingId) -> bool {
        match self.settings.get(&setting) {
            Some(value) => *value,
            None => rs.server_settings.get(setting).is_some_and(|s| s.default),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainId,
    #[serde(default)]
    pub extras: Vec<ExtraId>,
    #[serde(default)]
    pub owner: Option<PlayerId>,
    #[serde(default)]
    pub extras_owner: Option<PlayerId>,
    #[serde(default)]
    pub worked_by: Option<CityId>,
    #[serde(default)]
    pub city_center: Option<CityId>,
    #[serde(default)]
    pub continent: ContinentId,
    #[serde(default)]
    pub units: Vec<UnitId>,
}

impl Tile {
    pub fn new(terrain: TerrainId) -> Self {
        Self {
            terrain,
            extras: Vec::new(),
            owner: None,
            extras_owner: None,
            worked_by: None,
            city_center: None,
            continent: 0,
            units: Vec::new(),
        }
    }

    pub fn has_extra(&self, extra: ExtraId) -> bool {
        self.extras.contains(&extra)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameMap {
    pub geometry: MapGeometry,
    pub tiles: Vec<Tile>,
}

impl GameMap {
    /// A map of one terrain, every tile on continent 1.
    pub fn filled(geometry: MapGeometry, terrain: TerrainId) -> Self {
        let mut tile = Tile::new(terrain);
        tile.continent = 1;
        Self {
            geometry,
            tiles: vec![tile; geometry.tile_count()],
        }
    }

    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.tiles.get(index.0 as usize)
    }

    pub fn tile_mut(&mut self, index: TileIndex) -> Option<&mut Tile> {
        self.tiles.get_mut(index.0 as usize)
    }
}

/// One side of a player pair; stored on the player it belongs to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diplomacy {
    pub with: PlayerId,
    /// One of the mutually exclusive diplomatic states.
    pub state: DiplRel,
    #[serde(default)]
    pub gives_shared_vision: bool,
    /// This player has an embassy with `with`.
    #[serde(default)]
    pub has_embassy: bool,
    /// This player has a casus belli against `with`.
    #[serde(default)]
    pub has_casus_belli: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nation: NationId,
    pub team: TeamId,
    pub government: GovernmentId,
    /// `None` for human players.
    #[serde(default)]
    pub ai_level: Option<AiLevel>,
    #[serde(default = "default_alive")]
    pub is_alive: bool,
    #[serde(default)]
    pub known_techs: Vec<TechId>,
    #[serde(default)]
    pub achievements: Vec<AchievementId>,
    /// Accumulated national culture, excluding city culture.
    #[serde(default)]
    pub culture: i32,
    #[serde(default)]
    pub birth_turn: i32,
    #[serde(default)]
    pub diplomacy: Vec<Diplomacy>,
    /// Great and small wonders this player has ever completed.
    #[serde(default)]
    pub ever_built: Vec<BuildingId>,
}

fn default_alive() -> bool {
    true
}

impl Player {
    pub fn knows_tech(&self, tech: TechId) -> bool {
        self.known_techs.contains(&tech)
    }

    pub fn has_achievement(&self, achievement: AchievementId) -> bool {
        self.achievements.contains(&achievement)
    }

    pub fn diplomacy_with(&self, other: PlayerId) -> Option<&Diplomacy> {
        self.diplomacy.iter().find(|d| d.with == other)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFlags {
    #[serde(default)]
    pub starved: bool,
    #[serde(default)]
    pub disorder: bool,
    #[serde(default)]
    pub celebration: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    #[serde(default)]
    pub name: String,
    pub owner: PlayerId,
    pub original_owner: PlayerId,
    pub tile: TileIndex,
    pub size: i32,
    #[serde(default = "default_radius_sq")]
    pub radius_sq: i32,
    #[serde(default)]
    pub buildings: Vec<BuildingId>,
    #[serde(default)]
    pub trade_partners: Vec<CityId>,
    #[serde(default)]
    pub goods: Vec<GoodId>,
    /// Citizens by the player whose nationality they carry.
    #[serde(default)]
    pub citizens: BTreeMap<PlayerId, i32>,
    #[serde(default)]
    pub culture: i32,
    #[serde(default)]
    pub founded_turn: i32,
    #[serde(default)]
    pub status: CityFlags,
    #[serde(default)]
    pub specialists: BTreeMap<SpecialistId, i32>,
}

fn default_radius_sq() -> i32 {
    5
}

impl City {
    pub fn has_building(&self, building: BuildingId) -> bool {
        self.buildings.contains(&building)
    }

    /// Share of citizens not of the owner's nationality, in percent.
    pub fn foreign_percent(&self) -> i32 {
        if self.size <= 0 {
            return 0;
        }
        let foreign: i32 = self
            .citizens
            .iter()
            .filter(|(nationality, _)| **nationality != self.owner)
            .map(|(_, count)| *count)
            .sum();
        foreign * 100 / self.size
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub unit_type: UnitTypeId,
    #[serde(default)]
    pub veteran: u8,
    pub moves_left: i32,
    pub hp: i32,
    #[serde(default = "default_activity")]
    pub activity: Activity,
    pub tile: TileIndex,
    #[serde(default)]
    pub homecity: Option<CityId>,
    #[serde(default)]
    pub transported_by: Option<UnitId>,
    #[serde(default)]
    pub transporting: Vec<UnitId>,
    #[serde(default)]
    pub birth_turn: i32,
}

fn default_activity() -> Activity {
    Activity::Idle
}

/// Facts that outlive the entities they were about.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldHistory {
    /// One entry per completion, destroyed or not.
    #[serde(default)]
    pub buildings_built: Vec<BuildingId>,
    #[serde(default)]
    pub techs_ever_known: Vec<TechId>,
    #[serde(default)]
    pub nations_ever_in_play: Vec<NationId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameWorld {
    pub info: GameInfo,
    pub map: GameMap,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub history: WorldHistory,
}

impl GameWorld {
    pub fn new(info: GameInfo, map: GameMap) -> Self {
        Self {
            info,
            map,
            players: Vec::new(),
            cities: Vec::new(),
            units: Vec::new(),
            history: WorldHistory::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.map.tile(index)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }

    pub fn cities_of(&self, owner: PlayerId) -> impl Iterator<Item = &City> {
        self.cities.iter().filter(move |c| c.owner == owner)
    }

    pub fn city_continent(&self, city: &City) -> Option<ContinentId> {
        self.tile(city.tile).map(|t| t.continent)
    }

    /// Trade partners that still exist.
    pub fn trade_partners<'w>(&'w self, city: &'w City) -> impl Iterator<Item = &'w City> {
        city.trade_partners.iter().filter_map(|id| self.city(*id))
    }

    /// Tiles within the city's work radius, centre included.
    pub fn city_tiles(&self, city: &City) -> Vec<TileIndex> {
        self.map.geometry.tiles_within(city.tile, city.radius_sq)
    }

    // ------------------------------------------------------------------------
    // Diplomacy
    // ------------------------------------------------------------------------

    pub fn same_team(&self, a: PlayerId, b: PlayerId) -> bool {
        match (self.player(a), self.player(b)) {
            (Some(pa), Some(pb)) => pa.team == pb.team,
            _ => false,
        }
    }

    /// Diplomatic state from `a` towards `b`. Teammates are always `Team`;
    /// players with no recorded relation have never met.
    pub fn diplstate(&self, a: PlayerId, b: PlayerId) -> Option<DiplRel> {
        if a == b {
            return None;
        }
        if self.same_team(a, b) {
            return Some(DiplRel::Team);
        }
        let state = self
            .player(a)
            .and_then(|p| p.diplomacy_with(b))
            .map(|d| d.state)
            .unwrap_or(DiplRel::NoContact);
        Some(state)
    }

    pub fn are_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        a == b || matches!(self.diplstate(a, b), Some(DiplRel::Alliance | DiplRel::Team))
    }

    /// Does `rel` hold from `a` towards `b`. Never holds from a player to
    /// itself.
    pub fn has_diplrel(&self, a: PlayerId, b: PlayerId, rel: DiplRel) -> bool {
        if a == b {
            return false;
        }
        let side = |from: PlayerId, to: PlayerId| {
            self.player(from).and_then(|p| p.diplomacy_with(to))
        };
        match rel {
            DiplRel::Foreign => true,
            DiplRel::GivesSharedVision => side(a, b).is_some_and(|d| d.gives_shared_vision),
            DiplRel::ReceivesSharedVision => side(b, a).is_some_and(|d| d.gives_shared_vision),
            DiplRel::HasEmbassy => side(a, b).is_some_and(|d| d.has_embassy),
            DiplRel::HostsEmbassy => side(b, a).is_some_and(|d| d.has_embassy),
            DiplRel::HasCasusBelli => side(a, b).is_some_and(|d| d.has_casus_belli),
            DiplRel::ProvidedCasusBelli => side(b, a).is_some_and(|d| d.has_casus_belli),
            state => self.diplstate(a, b) == Some(state),
        }
    }

    /// Alive players covered by a social range around `player`: the player
    /// itself, its team, its allies, or everyone.
    pub fn players_in_range(&self, player: PlayerId, range: ReqRange) -> Vec<&Player> {
        self.alive_players()
            .filter(|other| match range {
                ReqRange::Team => self.same_team(player, other.id),
                ReqRange::Alliance => self.are_allied(player, other.id),
                ReqRange::World => true,
                _ => other.id == player,
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------------

    pub fn player_knows_tech(&self, player: PlayerId, tech: TechId) -> bool {
        self.player(player).is_some_and(|p| p.knows_tech(tech))
    }

    /// Existing copies of a building across all cities.
    pub fn num_world_buildings(&self, building: BuildingId) -> usize {
        self.cities.iter().filter(|c| c.has_building(building)).count()
    }

    /// Copies ever completed, including destroyed ones.
    pub fn num_world_buildings_total(&self, building: BuildingId) -> usize {
        self.history
            .buildings_built
            .iter()
            .filter(|b| **b == building)
            .count()
    }

    pub fn num_player_buildings(&self, player: PlayerId, building: BuildingId) -> usize {
        self.cities_of(player)
            .filter(|c| c.has_building(building))
            .count()
    }

    pub fn num_continent_buildings(&self, continent: ContinentId, building: BuildingId) -> usize {
        self.cities
            .iter()
            .filter(|c| c.has_building(building) && self.city_continent(c) == Some(continent))
            .count()
    }

    /// National culture plus the culture of every city the player owns.
    pub fn player_culture(&self, player: &Player) -> i32 {
        player.culture
            + self
                .cities_of(player.id)
                .map(|c| c.culture)
                .sum::<i32>()
    }

    /// Distinct techs known by anyone, now or in the past.
    pub fn global_advance_count(&self) -> usize {
        let mut known: Vec<TechId> = self
            .players
            .iter()
            .flat_map(|p| p.known_techs.iter().copied())
            .chain(self.history.techs_ever_known.iter().copied())
            .collect();
        known.sort();
        known.dedup();
        known.len()
    }

    pub fn tech_ever_known(&self, tech: TechId) -> bool {
        self.history.techs_ever_known.contains(&tech)
            || self.players.iter().any(|p| p.knows_tech(tech))
    }

    pub fn nation_ever_in_play(&self, nation: NationId) -> bool {
        self.history.nations_ever_in_play.contains(&nation)
            || self.players.iter().any(|p| p.nation == nation)
    }
}
