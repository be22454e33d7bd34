//! One scoped, signed test over a [`Universal`], plus the per-kind range and
//! `survives` tables that decide which combinations are meaningful.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use backbay_ruleset::Ruleset;

use crate::range::ReqRange;
use crate::universal::{Universal, UniversalKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReqError {
    #[error("unknown requirement type '{0}'")]
    UnknownKind(String),
    #[error("unknown range '{0}'")]
    UnknownRange(String),
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: UniversalKind, value: String },
    #[error("unresolvable {kind} number {value}")]
    BadNumber { kind: UniversalKind, value: i32 },
    #[error("bad range")]
    BadRange { kind: UniversalKind, range: ReqRange },
    #[error("bad 'survives'")]
    BadSurvives { kind: UniversalKind, range: ReqRange },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub source: Universal,
    pub range: ReqRange,
    pub survives: bool,
    pub present: bool,
    /// Only hides the requirement from help text.
    pub quiet: bool,
}

/// Textual form of a requirement as it appears in rule files.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRequirement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub survives: bool,
    #[serde(default = "default_present")]
    pub present: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub quiet: bool,
}

fn default_present() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Numeric form used by savegames and the network layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRequirement {
    pub kind: i32,
    pub range: i32,
    pub survives: bool,
    pub present: bool,
    pub quiet: bool,
    pub value: i32,
}

// ============================================================================
// RANGE TABLES
// ============================================================================

use ReqRange as R;

const LOCAL_ONLY: &[ReqRange] = &[R::Local];
const NEIGHBOURHOOD: &[ReqRange] = &[R::Local, R::CAdjacent, R::Adjacent];
const TILE_LIKE: &[ReqRange] = &[R::Local, R::CAdjacent, R::Adjacent, R::City, R::TradeRoute];
const CITY_LIKE: &[ReqRange] = &[R::City, R::TradeRoute];
const CITY_ONLY: &[ReqRange] = &[R::City];
const CULTURE: &[ReqRange] = &[R::City, R::TradeRoute, R::Player, R::Team, R::Alliance, R::World];
const PLAYER_ONLY: &[ReqRange] = &[R::Player];
const SOCIAL: &[ReqRange] = &[R::Player, R::Team, R::Alliance, R::World];
const PLAYER_OR_WORLD: &[ReqRange] = &[R::Player, R::World];
const DIPLOMATIC: &[ReqRange] = &[R::Local, R::Player, R::Team, R::Alliance, R::World];
const WORLD_ONLY: &[ReqRange] = &[R::World];
const AGE: &[ReqRange] = &[R::Local, R::City, R::Player];
const BUILDING: &[ReqRange] = &[
    R::Local,
    R::City,
    R::TradeRoute,
    R::Continent,
    R::Player,
    R::Team,
    R::Alliance,
    R::World,
];
const NONE: &[ReqRange] = &[];

/// Range assumed when a rule file leaves it out.
pub fn default_range(kind: UniversalKind) -> ReqRange {
    use UniversalKind as K;
    match kind {
        K::Improvement
        | K::MinSize
        | K::MinCulture
        | K::MinForeignPct
        | K::Nationality
        | K::CityStatus
        | K::Good => R::City,
        K::Government
        | K::Achievement
        | K::Advance
        | K::TechFlag
        | K::Nation
        | K::NationGroup
        | K::AiLevel => R::Player,
        K::MinYear | K::MinCalFrag | K::TopologyFlag | K::MinTechs | K::ServerSetting => R::World,
        _ => R::Local,
    }
}

/// Ranges at which a kind has a defined meaning.
pub fn legal_ranges(kind: UniversalKind) -> &'static [ReqRange] {
    use UniversalKind as K;
    match kind {
        K::None | K::Invalid => ReqRange::ALL,
        K::Specialist
        | K::OutputType
        | K::Action
        | K::VisionLayer
        | K::NationalIntel
        | K::ImprGenus
        | K::TerrainAlter
        | K::UnitType
        | K::UnitTypeFlag
        | K::UnitClass
        | K::UnitClassFlag
        | K::MinVeteran
        | K::UnitState
        | K::Activity
        | K::MinMoveFrags
        | K::MinHitPoints => LOCAL_ONLY,
        K::Terrain
        | K::TerrainClass
        | K::TerrainFlag
        | K::Extra
        | K::ExtraFlag
        | K::BaseFlag
        | K::RoadFlag => TILE_LIKE,
        K::MaxUnitsOnTile | K::CityTile => NEIGHBOURHOOD,
        K::MinSize | K::Nationality | K::CityStatus | K::MinForeignPct => CITY_LIKE,
        K::Good => CITY_ONLY,
        K::MinCulture => CULTURE,
        K::AiLevel | K::Government => PLAYER_ONLY,
        K::Advance | K::TechFlag | K::Achievement | K::Nation | K::NationGroup => SOCIAL,
        K::MinTechs => PLAYER_OR_WORLD,
        K::DiplRel => DIPLOMATIC,
        K::MinYear | K::MinCalFrag | K::TopologyFlag | K::ServerSetting => WORLD_ONLY,
        K::Age => AGE,
        K::Improvement => BUILDING,
    }
}

/// Ranges at which `survives` may be set: only facts with a kept history.
pub fn survives_ranges(kind: UniversalKind) -> &'static [ReqRange] {
    use UniversalKind as K;
    match kind {
        K::Improvement => SOCIAL,
        K::Advance | K::Nation => WORLD_ONLY,
        _ => NONE,
    }
}

pub fn range_is_legal(kind: UniversalKind, range: ReqRange) -> bool {
    legal_ranges(kind).contains(&range)
}

pub fn survives_is_legal(kind: UniversalKind, range: ReqRange) -> bool {
    survives_ranges(kind).contains(&range)
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Requirement {
    /// Unchecked constructor; use [`Requirement::validate`] or the text and
    /// numeric constructors when the parts come from data.
    pub fn new(source: Universal, range: ReqRange, present: bool) -> Self {
        Self {
            source,
            range,
            survives: false,
            present,
            quiet: false,
        }
    }

    pub fn with_survives(mut self, survives: bool) -> Self {
        self.survives = survives;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Marker left behind when a requirement could not be built.
    pub fn invalid() -> Self {
        Self::new(Universal::Invalid, ReqRange::Local, true)
    }

    pub fn is_invalid(&self) -> bool {
        self.source.is_invalid()
    }

    pub fn kind(&self) -> UniversalKind {
        self.source.kind()
    }

    /// Same requirement with `present` flipped.
    pub fn negated(&self) -> Self {
        Self {
            present: !self.present,
            ..*self
        }
    }

    /// Equality of everything evaluation looks at; `quiet` is ignored.
    pub fn same_test(&self, other: &Requirement) -> bool {
        self.source == other.source
            && self.range == other.range
            && self.survives == other.survives
            && self.present == other.present
    }

    pub fn validate(&self) -> Result<(), ReqError> {
        let kind = self.kind();
        if !range_is_legal(kind, self.range) {
            return Err(ReqError::BadRange {
                kind,
                range: self.range,
            });
        }
        if self.survives && !survives_is_legal(kind, self.range) {
            return Err(ReqError::BadSurvives {
                kind,
                range: self.range,
            });
        }
        Ok(())
    }

    /// Build a requirement from rule-file names. A missing or empty range
    /// falls back to [`default_range`].
    pub fn from_text(
        rs: &Ruleset,
        kind_name: &str,
        range_name: Option<&str>,
        survives: bool,
        present: bool,
        quiet: bool,
        value_name: &str,
    ) -> Result<Self, ReqError> {
        let kind = UniversalKind::by_name(kind_name.trim())
            .filter(|kind| *kind != UniversalKind::Invalid)
            .ok_or_else(|| ReqError::UnknownKind(kind_name.to_string()))?;

        let range = match range_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => {
                ReqRange::by_name(name).ok_or_else(|| ReqError::UnknownRange(name.to_string()))?
            }
            None => default_range(kind),
        };

        let source = Universal::from_rule_name(kind, value_name, rs);
        if source.is_invalid() {
            return Err(ReqError::UnknownValue {
                kind,
                value: value_name.to_string(),
            });
        }

        let req = Self {
            source,
            range,
            survives,
            present,
            quiet,
        };
        req.validate()?;
        Ok(req)
    }

    pub fn from_raw(rs: &Ruleset, raw: &RawRequirement) -> Result<Self, ReqError> {
        Self::from_text(
            rs,
            &raw.kind,
            raw.range.as_deref(),
            raw.survives,
            raw.present,
            raw.quiet,
            &raw.name,
        )
    }

    /// Like [`Requirement::from_text`], but a failure is logged against
    /// `owner` and yields the invalid marker instead of an error.
    pub fn from_text_or_invalid(rs: &Ruleset, owner: &str, raw: &RawRequirement) -> Self {
        match Self::from_raw(rs, raw) {
            Ok(req) => req,
            Err(err) => {
                warn!(
                    owner,
                    kind = %raw.kind,
                    name = %raw.name,
                    range = raw.range.as_deref().unwrap_or(""),
                    error = %err,
                    "requirement rejected"
                );
                Self::invalid()
            }
        }
    }

    pub fn from_numeric(rs: &Ruleset, num: &NumericRequirement) -> Result<Self, ReqError> {
        let kind = usize::try_from(num.kind)
            .ok()
            .and_then(UniversalKind::from_index)
            .filter(|kind| *kind != UniversalKind::Invalid)
            .ok_or_else(|| ReqError::UnknownKind(num.kind.to_string()))?;
        let range = usize::try_from(num.range)
            .ok()
            .and_then(ReqRange::from_index)
            .ok_or_else(|| ReqError::UnknownRange(num.range.to_string()))?;
        let source = Universal::from_number(kind, num.value, rs);
        if source.is_invalid() {
            return Err(ReqError::BadNumber {
                kind,
                value: num.value,
            });
        }
        let req = Self {
            source,
            range,
            survives: num.survives,
            present: num.present,
            quiet: num.quiet,
        };
        req.validate()?;
        Ok(req)
    }

    pub fn to_numeric(&self) -> NumericRequirement {
        let (kind, value) = self.source.to_number();
        NumericRequirement {
            kind: kind.index() as i32,
            range: self.range.index() as i32,
            survives: self.survives,
            present: self.present,
            quiet: self.quiet,
            value,
        }
    }

    /// Inverse of [`Requirement::from_raw`], for writing rule files back out.
    pub fn to_text_parts(&self, rs: &Ruleset) -> RawRequirement {
        RawRequirement {
            kind: self.kind().name().to_string(),
            name: self.source.rule_name(rs),
            range: Some(self.range.name().to_string()),
            survives: self.survives,
            present: self.present,
            quiet: self.quiet,
        }
    }
}
