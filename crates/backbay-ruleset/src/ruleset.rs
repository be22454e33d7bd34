use crate::catalog::{Catalog, FlagNames};
use crate::entities::{
    Achievement, ActionDef, Building, BuildingGenus, Extra, Good, Government, Nation,
    NationGroup, ServerSetting, Specialist, Technology, Terrain, TerrainAlteration, TerrainClass,
    UnitClass, UnitType,
};
use crate::ids::{
    AchievementTag, ActionTag, BaseFlagId, BuildingId, BuildingTag, ExtraFlagId, ExtraId,
    ExtraTag, GoodTag, GovernmentTag, NationGroupId, NationGroupTag, NationId, NationTag,
    RoadFlagId, ServerSettingTag, SpecialistTag, TechFlagId, TechId, TechTag, TerrainFlagId,
    TerrainId, TerrainTag, UnitClassFlagId, UnitClassId, UnitClassTag, UnitTypeFlagId,
    UnitTypeId, UnitTypeTag,
};

/// Compiled entity tables of one loaded ruleset.
///
/// Populated once at load and read-only afterwards; a reload builds a new
/// `Ruleset` instead of mutating this one.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    pub name: String,

    pub techs: Catalog<TechTag, Technology>,
    pub governments: Catalog<GovernmentTag, Government>,
    pub achievements: Catalog<AchievementTag, Achievement>,
    pub buildings: Catalog<BuildingTag, Building>,
    pub extras: Catalog<ExtraTag, Extra>,
    pub goods: Catalog<GoodTag, Good>,
    pub terrains: Catalog<TerrainTag, Terrain>,
    pub nations: Catalog<NationTag, Nation>,
    pub nation_groups: Catalog<NationGroupTag, NationGroup>,
    pub unit_classes: Catalog<UnitClassTag, UnitClass>,
    pub unit_types: Catalog<UnitTypeTag, UnitType>,
    pub actions: Catalog<ActionTag, ActionDef>,
    pub specialists: Catalog<SpecialistTag, Specialist>,
    pub server_settings: Catalog<ServerSettingTag, ServerSetting>,

    pub tech_flags: FlagNames,
    pub terrain_flags: FlagNames,
    pub unit_type_flags: FlagNames,
    pub unit_class_flags: FlagNames,
    pub extra_flags: FlagNames,
    pub base_flags: FlagNames,
    pub road_flags: FlagNames,
}

impl Ruleset {
    pub fn tech_has_flag(&self, tech: TechId, flag: TechFlagId) -> bool {
        self.techs
            .get(tech)
            .is_some_and(|t| t.flags.contains(&flag))
    }

    pub fn building_genus(&self, building: BuildingId) -> Option<BuildingGenus> {
        self.buildings.get(building).map(|b| b.genus)
    }

    pub fn is_great_wonder(&self, building: BuildingId) -> bool {
        self.building_genus(building) == Some(BuildingGenus::GreatWonder)
    }

    pub fn terrain_class(&self, terrain: TerrainId) -> Option<TerrainClass> {
        self.terrains.get(terrain).map(|t| t.class)
    }

    pub fn terrain_has_flag(&self, terrain: TerrainId, flag: TerrainFlagId) -> bool {
        self.terrains
            .get(terrain)
            .is_some_and(|t| t.flags.contains(&flag))
    }

    pub fn terrain_allows(&self, terrain: TerrainId, alteration: TerrainAlteration) -> bool {
        self.terrains
            .get(terrain)
            .is_some_and(|t| t.alterations.contains(&alteration))
    }

    pub fn is_native_terrain(&self, class: UnitClassId, terrain: TerrainId) -> bool {
        self.terrains
            .get(terrain)
            .is_some_and(|t| t.native_to.contains(&class))
    }

    pub fn extra_has_flag(&self, extra: ExtraId, flag: ExtraFlagId) -> bool {
        self.extras
            .get(extra)
            .is_some_and(|e| e.flags.contains(&flag))
    }

    pub fn extra_has_base_flag(&self, extra: ExtraId, flag: BaseFlagId) -> bool {
        self.extras
            .get(extra)
            .is_some_and(|e| e.base_flags.contains(&flag))
    }

    pub fn extra_has_road_flag(&self, extra: ExtraId, flag: RoadFlagId) -> bool {
        self.extras
            .get(extra)
            .is_some_and(|e| e.road_flags.contains(&flag))
    }

    pub fn nation_in_group(&self, nation: NationId, group: NationGroupId) -> bool {
        self.nations
            .get(nation)
            .is_some_and(|n| n.groups.contains(&group))
    }

    pub fn unit_class_of(&self, unit_type: UnitTypeId) -> Option<UnitClassId> {
        self.unit_types.get(unit_type).map(|u| u.class)
    }

    pub fn unit_type_has_flag(&self, unit_type: UnitTypeId, flag: UnitTypeFlagId) -> bool {
        self.unit_types
            .get(unit_type)
            .is_some_and(|u| u.flags.contains(&flag))
    }

    pub fn unit_class_has_flag(&self, class: UnitClassId, flag: UnitClassFlagId) -> bool {
        self.unit_classes
            .get(class)
            .is_some_and(|c| c.flags.contains(&flag))
    }

    pub fn unit_type_class_has_flag(&self, unit_type: UnitTypeId, flag: UnitClassFlagId) -> bool {
        self.unit_class_of(unit_type)
            .is_some_and(|class| self.unit_class_has_flag(class, flag))
    }

    /// Number of terrains of a class; bounds how many distinct terrain
    /// requirements of that class a tile neighbourhood can satisfy.
    pub fn terrains_in_class(&self, class: TerrainClass) -> usize {
        self.terrains.iter().filter(|(_, t)| t.class == class).count()
    }
}
