use serde::Deserialize;

use crate::catalog::Named;
use crate::ids::{
    BaseFlagId, ExtraFlagId, NationGroupId, RoadFlagId, TechFlagId, TerrainFlagId,
    UnitClassFlagId, UnitClassId, UnitTypeFlagId,
};
use crate::named_enum;

named_enum! {
    /// Broad category of a building; decides wonder uniqueness.
    pub enum BuildingGenus {
        GreatWonder => "GreatWonder",
        SmallWonder => "SmallWonder",
        Improvement => "Improvement",
        Special => "Special",
        Convert => "Convert",
    }
}

impl BuildingGenus {
    pub fn is_wonder(self) -> bool {
        matches!(self, BuildingGenus::GreatWonder | BuildingGenus::SmallWonder)
    }
}

named_enum! {
    pub enum TerrainClass {
        Land => "Land",
        Oceanic => "Oceanic",
    }
}

named_enum! {
    /// Terrain alterations a unit could perform on a terrain.
    pub enum TerrainAlteration {
        CanIrrigate => "CanIrrigate",
        CanMine => "CanMine",
        CanRoad => "CanRoad",
        CanTransform => "CanTransform",
    }
}

macro_rules! named_entity {
    ($ty:ident) => {
        impl Named for $ty {
            fn rule_name(&self) -> &str {
                &self.name
            }

            fn label(&self) -> &str {
                &self.label
            }
        }
    };
}

#[derive(Clone, Debug)]
pub struct Technology {
    pub name: String,
    pub label: String,
    pub flags: Vec<TechFlagId>,
}

#[derive(Clone, Debug)]
pub struct Government {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct Achievement {
    pub name: String,
    pub label: String,
    /// Only the first player to reach it gets it.
    pub unique: bool,
}

#[derive(Clone, Debug)]
pub struct Building {
    pub name: String,
    pub label: String,
    pub genus: BuildingGenus,
}

impl Building {
    pub fn is_great_wonder(&self) -> bool {
        self.genus == BuildingGenus::GreatWonder
    }
}

#[derive(Clone, Debug)]
pub struct Extra {
    pub name: String,
    pub label: String,
    pub flags: Vec<ExtraFlagId>,
    pub base_flags: Vec<BaseFlagId>,
    pub road_flags: Vec<RoadFlagId>,
}

#[derive(Clone, Debug)]
pub struct Good {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct Terrain {
    pub name: String,
    pub label: String,
    pub class: TerrainClass,
    pub flags: Vec<TerrainFlagId>,
    pub alterations: Vec<TerrainAlteration>,
    /// Unit classes that can exist on this terrain without transport.
    pub native_to: Vec<UnitClassId>,
}

#[derive(Clone, Debug)]
pub struct Nation {
    pub name: String,
    pub label: String,
    pub groups: Vec<NationGroupId>,
}

#[derive(Clone, Debug)]
pub struct NationGroup {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct UnitClass {
    pub name: String,
    pub label: String,
    pub flags: Vec<UnitClassFlagId>,
}

#[derive(Clone, Debug)]
pub struct UnitType {
    pub name: String,
    pub label: String,
    pub class: UnitClassId,
    pub flags: Vec<UnitTypeFlagId>,
    pub veteran_levels: u8,
    pub hp: i32,
    pub move_rate: i32,
}

#[derive(Clone, Debug)]
pub struct ActionDef {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct Specialist {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct ServerSetting {
    pub name: String,
    pub label: String,
    pub default: bool,
}

named_entity!(Technology);
named_entity!(Government);
named_entity!(Achievement);
named_entity!(Building);
named_entity!(Extra);
named_entity!(Good);
named_entity!(Terrain);
named_entity!(Nation);
named_entity!(NationGroup);
named_entity!(UnitClass);
named_entity!(UnitType);
named_entity!(ActionDef);
named_entity!(Specialist);
named_entity!(ServerSetting);

// ============================================================================
// RAW (YAML) FORMS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTechnology {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBuilding {
    #[serde(default)]
    pub label: Option<String>,
    pub genus: BuildingGenus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExtra {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub base_flags: Vec<String>,
    #[serde(default)]
    pub road_flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTerrain {
    #[serde(default)]
    pub label: Option<String>,
    pub class: TerrainClass,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub alterations: Vec<TerrainAlteration>,
    #[serde(default)]
    pub native_to: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNation {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUnitClass {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnitType {
    #[serde(default)]
    pub label: Option<String>,
    pub class: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default = "default_veteran_levels")]
    pub veteran_levels: u8,
    pub hp: i32,
    pub move_rate: i32,
}

fn default_veteran_levels() -> u8 {
    4
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAchievement {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServerSetting {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// Entry with nothing but an optional display label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabelled {
    #[serde(default)]
    pub label: Option<String>,
}
