use backbay_ruleset::{ActionId, BuildingId, SpecialistId, TileIndex, UnitTypeId};

use crate::universal::{NationalIntel, OutputType, VisionLayer};
use crate::world::{City, GameWorld, Player, Tile, Unit};

/// Everything a single evaluation may look at. Every field is optional;
/// evaluators answer `Maybe` when the field they need is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqContext<'a> {
    pub world: Option<&'a GameWorld>,
    pub player: Option<&'a Player>,
    pub other_player: Option<&'a Player>,
    pub city: Option<&'a City>,
    pub building: Option<BuildingId>,
    pub tile: Option<TileIndex>,
    pub unit: Option<&'a Unit>,
    pub unit_type: Option<UnitTypeId>,
    pub output_type: Option<OutputType>,
    pub specialist: Option<SpecialistId>,
    pub action: Option<ActionId>,
    pub vision_layer: Option<VisionLayer>,
    pub nintel: Option<NationalIntel>,
}

impl<'a> ReqContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(mut self, world: &'a GameWorld) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_player(mut self, player: &'a Player) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_other_player(mut self, other: &'a Player) -> Self {
        self.other_player = Some(other);
        self
    }

    pub fn with_city(mut self, city: &'a City) -> Self {
        self.city = Some(city);
        self
    }

    pub fn with_building(mut self, building: BuildingId) -> Self {
        self.building = Some(building);
        self
    }

    pub fn with_tile(mut self, tile: TileIndex) -> Self {
        self.tile = Some(tile);
        self
    }

    pub fn with_unit(mut self, unit: &'a Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_unit_type(mut self, unit_type: UnitTypeId) -> Self {
        self.unit_type = Some(unit_type);
        self
    }

    pub fn with_output_type(mut self, output: OutputType) -> Self {
        self.output_type = Some(output);
        self
    }

    pub fn with_specialist(mut self, specialist: SpecialistId) -> Self {
        self.specialist = Some(specialist);
        self
    }

    pub fn with_action(mut self, action: ActionId) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_vision_layer(mut self, layer: VisionLayer) -> Self {
        self.vision_layer = Some(layer);
        self
    }

    pub fn with_nintel(mut self, nintel: NationalIntel) -> Self {
        self.nintel = Some(nintel);
        self
    }

    /// The unit's type, falling back to the bare unit type field.
    pub fn unit_type(&self) -> Option<UnitTypeId> {
        self.unit.map(|u| u.unit_type).or(self.unit_type)
    }

    pub fn tile_data(&self) -> Option<&'a Tile> {
        self.world?.tile(self.tile?)
    }
}
