use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rule names are strings used in YAML files (human-readable, stable across versions)
pub type RuleName = String;

/// Runtime IDs are integers compiled at ruleset load (fast, deterministic)
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeId<T> {
    pub raw: u16,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> RuntimeId<T> {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

// Manual impls so the tag types don't need to implement anything.
impl<T> Clone for RuntimeId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RuntimeId<T> {}

impl<T> PartialEq for RuntimeId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for RuntimeId<T> {}

impl<T> std::hash::Hash for RuntimeId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> PartialOrd for RuntimeId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RuntimeId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> fmt::Debug for RuntimeId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

// Type-safe runtime IDs
pub enum TechTag {}
pub enum GovernmentTag {}
pub enum AchievementTag {}
pub enum BuildingTag {}
pub enum ExtraTag {}
pub enum GoodTag {}
pub enum TerrainTag {}
pub enum NationTag {}
pub enum NationGroupTag {}
pub enum UnitTypeTag {}
pub enum UnitClassTag {}
pub enum ActionTag {}
pub enum SpecialistTag {}
pub enum ServerSettingTag {}

pub type TechId = RuntimeId<TechTag>;
pub type GovernmentId = RuntimeId<GovernmentTag>;
pub type AchievementId = RuntimeId<AchievementTag>;
pub type BuildingId = RuntimeId<BuildingTag>;
pub type ExtraId = RuntimeId<ExtraTag>;
pub type GoodId = RuntimeId<GoodTag>;
pub type TerrainId = RuntimeId<TerrainTag>;
pub type NationId = RuntimeId<NationTag>;
pub type NationGroupId = RuntimeId<NationGroupTag>;
pub type UnitTypeId = RuntimeId<UnitTypeTag>;
pub type UnitClassId = RuntimeId<UnitClassTag>;
pub type ActionId = RuntimeId<ActionTag>;
pub type SpecialistId = RuntimeId<SpecialistTag>;
pub type ServerSettingId = RuntimeId<ServerSettingTag>;

macro_rules! flag_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u16);
    };
}

flag_id!(
    /// Index into the ruleset's tech flag names.
    TechFlagId
);
flag_id!(
    /// Index into the ruleset's terrain flag names.
    TerrainFlagId
);
flag_id!(
    /// Index into the ruleset's unit type flag names.
    UnitTypeFlagId
);
flag_id!(
    /// Index into the ruleset's unit class flag names.
    UnitClassFlagId
);
flag_id!(ExtraFlagId);
flag_id!(BaseFlagId);
flag_id!(RoadFlagId);

/// Entity IDs are generational (safe handles to mutable storage)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl EntityId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            index: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> u64 {
        ((self.index as u64) << 32) | (self.generation as u64)
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

pub type UnitId = EntityId;
pub type CityId = EntityId;

/// Player ID is a simple index (max 64 players)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

/// Team ID groups players that share research and victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

/// Linear index of a tile in map storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileIndex(pub u32);

/// Continent (landmass or ocean body) number assigned at map generation.
pub type ContinentId = i32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_raw_roundtrip() {
        let id = EntityId::new(7, 3);
        assert_eq!(EntityId::from_raw(id.to_raw()), id);
    }

    #[test]
    fn runtime_ids_compare_by_raw() {
        assert_eq!(TechId::new(4), TechId::new(4));
        assert!(TechId::new(1) < TechId::new(2));
        assert_eq!(TechId::new(9).index(), 9);
    }
}
