use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, FlagNames, Named};
use crate::entities::{
    Achievement, ActionDef, Building, Extra, Good, Government, Nation, NationGroup,
    RawAchievement, RawBuilding, RawExtra, RawLabelled, RawNation, RawServerSetting,
    RawTechnology, RawTerrain, RawUnitClass, RawUnitType, ServerSetting, Specialist, Technology,
    Terrain, UnitClass, UnitType,
};
use crate::ids::RuntimeId;
use crate::ruleset::Ruleset;

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("unknown {category} flag: {flag}")]
    UnknownFlag { category: &'static str, flag: String },
    #[error("too many {0} entries")]
    TooMany(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub enum RulesetSource<'a> {
    Embedded,
    Path(String),
    Str {
        terrain: &'a str,
        units: &'a str,
        techs: &'a str,
        cities: &'a str,
        game: &'a str,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTerrainFile {
    terrain_flags: Vec<String>,
    extra_flags: Vec<String>,
    base_flags: Vec<String>,
    road_flags: Vec<String>,
    terrains: BTreeMap<String, RawTerrain>,
    extras: BTreeMap<String, RawExtra>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUnitsFile {
    unit_type_flags: Vec<String>,
    unit_class_flags: Vec<String>,
    unit_classes: BTreeMap<String, RawUnitClass>,
    unit_types: BTreeMap<String, RawUnitType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTechsFile {
    tech_flags: Vec<String>,
    techs: BTreeMap<String, RawTechnology>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCitiesFile {
    buildings: BTreeMap<String, RawBuilding>,
    goods: BTreeMap<String, RawLabelled>,
    specialists: BTreeMap<String, RawLabelled>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGameFile {
    name: Option<String>,
    governments: BTreeMap<String, RawLabelled>,
    achievements: BTreeMap<String, RawAchievement>,
    nation_groups: BTreeMap<String, RawLabelled>,
    nations: BTreeMap<String, RawNation>,
    actions: BTreeMap<String, RawLabelled>,
    server_settings: BTreeMap<String, RawServerSetting>,
}

struct RawRuleset {
    terrain: RawTerrainFile,
    units: RawUnitsFile,
    techs: RawTechsFile,
    cities: RawCitiesFile,
    game: RawGameFile,
}

pub fn load_ruleset(source: RulesetSource<'_>) -> Result<Ruleset, RulesetError> {
    let raw = match source {
        RulesetSource::Embedded => parse_raw_ruleset(
            include_str!("../data/base/terrain.yaml"),
            include_str!("../data/base/units.yaml"),
            include_str!("../data/base/techs.yaml"),
            include_str!("../data/base/cities.yaml"),
            include_str!("../data/base/game.yaml"),
        )?,
        RulesetSource::Path(path) => {
            let terrain = std::fs::read_to_string(format!("{path}/terrain.yaml"))?;
            let units = std::fs::read_to_string(format!("{path}/units.yaml"))?;
            let techs = std::fs::read_to_string(format!("{path}/techs.yaml"))?;
            let cities = std::fs::read_to_string(format!("{path}/cities.yaml"))?;
            let game = std::fs::read_to_string(format!("{path}/game.yaml"))?;
            parse_raw_ruleset(&terrain, &units, &techs, &cities, &game)?
        }
        RulesetSource::Str {
            terrain,
            units,
            techs,
            cities,
            game,
        } => parse_raw_ruleset(terrain, units, techs, cities, game)?,
    };

    compile_ruleset(raw)
}

fn parse_raw_ruleset(
    terrain_yaml: &str,
    units_yaml: &str,
    techs_yaml: &str,
    cities_yaml: &str,
    game_yaml: &str,
) -> Result<RawRuleset, RulesetError> {
    Ok(RawRuleset {
        terrain: parse_section(terrain_yaml)?,
        units: parse_section(units_yaml)?,
        techs: parse_section(techs_yaml)?,
        cities: parse_section(cities_yaml)?,
        game: parse_section(game_yaml)?,
    })
}

// An empty document deserializes to the section's defaults.
fn parse_section<T: Default + for<'de> Deserialize<'de>>(yaml: &str) -> Result<T, RulesetError> {
    if yaml.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str::<Option<T>>(yaml)?.unwrap_or_default())
}

fn resolve_flags<F>(
    names: &[String],
    table: &FlagNames,
    category: &'static str,
    wrap: impl Fn(u16) -> F,
) -> Result<Vec<F>, RulesetError> {
    names
        .iter()
        .map(|name| {
            table
                .by_name(name)
                .map(&wrap)
                .ok_or_else(|| RulesetError::UnknownFlag {
                    category,
                    flag: name.clone(),
                })
        })
        .collect()
}

fn resolve_id<Tag, T: Named>(
    catalog: &Catalog<Tag, T>,
    name: &str,
) -> Result<RuntimeId<Tag>, RulesetError> {
    catalog
        .id_by_name(name)
        .ok_or_else(|| RulesetError::MissingId(name.to_string()))
}

fn check_len(len: usize, what: &'static str) -> Result<(), RulesetError> {
    if len > u16::MAX as usize {
        return Err(RulesetError::TooMany(what));
    }
    Ok(())
}

fn label_or(name: &str, label: Option<String>) -> String {
    label.unwrap_or_else(|| name.to_string())
}

fn labelled<T>(
    raw: BTreeMap<String, RawLabelled>,
    what: &'static str,
    build: impl Fn(String, String) -> T,
) -> Result<Vec<T>, RulesetError> {
    check_len(raw.len(), what)?;
    Ok(raw
        .into_iter()
        .map(|(name, r)| {
            let label = label_or(&name, r.label);
            build(name, label)
        })
        .collect())
}

fn compile_ruleset(raw: RawRuleset) -> Result<Ruleset, RulesetError> {
    let RawRuleset {
        terrain,
        units,
        techs,
        cities,
        game,
    } = raw;

    let mut rs = Ruleset {
        name: game.name.clone().unwrap_or_else(|| "unnamed".to_string()),
        tech_flags: FlagNames::new(techs.tech_flags),
        terrain_flags: FlagNames::new(terrain.terrain_flags),
        unit_type_flags: FlagNames::new(units.unit_type_flags),
        unit_class_flags: FlagNames::new(units.unit_class_flags),
        extra_flags: FlagNames::new(terrain.extra_flags),
        base_flags: FlagNames::new(terrain.base_flags),
        road_flags: FlagNames::new(terrain.road_flags),
        ..Ruleset::default()
    };

    // Tables with no cross references first.
    rs.governments = Catalog::from_items(labelled(game.governments, "government", |name, label| {
        Government { name, label }
    })?);
    rs.nation_groups = Catalog::from_items(labelled(
        game.nation_groups,
        "nation group",
        |name, label| NationGroup { name, label },
    )?);
    rs.actions = Catalog::from_items(labelled(game.actions, "action", |name, label| {
        ActionDef { name, label }
    })?);
    rs.goods = Catalog::from_items(labelled(cities.goods, "good", |name, label| Good {
        name,
        label,
    })?);
    rs.specialists = Catalog::from_items(labelled(
        cities.specialists,
        "specialist",
        |name, label| Specialist { name, label },
    )?);

    check_len(game.achievements.len(), "achievement")?;
    rs.achievements = Catalog::from_items(
        game.achievements
            .into_iter()
            .map(|(name, a)| Achievement {
                label: label_or(&name, a.label),
                name,
                unique: a.unique,
            })
            .collect(),
    );

    check_len(game.server_settings.len(), "server setting")?;
    rs.server_settings = Catalog::from_items(
        game.server_settings
            .into_iter()
            .map(|(name, s)| ServerSetting {
                label: label_or(&name, s.label),
                name,
                default: s.default,
            })
            .collect(),
    );

    check_len(cities.buildings.len(), "building")?;
    rs.buildings = Catalog::from_items(
        cities
            .buildings
            .into_iter()
            .map(|(name, b)| Building {
                label: label_or(&name, b.label),
                name,
                genus: b.genus,
            })
            .collect(),
    );

    check_len(techs.techs.len(), "tech")?;
    let mut compiled_techs = Vec::with_capacity(techs.techs.len());
    for (name, t) in techs.techs {
        let flags = resolve_flags(&t.flags, &rs.tech_flags, "tech", crate::ids::TechFlagId)?;
        compiled_techs.push(Technology {
            label: label_or(&name, t.label),
            name,
            flags,
        });
    }
    rs.techs = Catalog::from_items(compiled_techs);

    check_len(units.unit_classes.len(), "unit class")?;
    let mut classes = Vec::with_capacity(units.unit_classes.len());
    for (name, c) in units.unit_classes {
        let flags = resolve_flags(
            &c.flags,
            &rs.unit_class_flags,
            "unit class",
            crate::ids::UnitClassFlagId,
        )?;
        classes.push(UnitClass {
            label: label_or(&name, c.label),
            name,
            flags,
        });
    }
    rs.unit_classes = Catalog::from_items(classes);

    check_len(units.unit_types.len(), "unit type")?;
    let mut unit_types = Vec::with_capacity(units.unit_types.len());
    for (name, u) in units.unit_types {
        let class = resolve_id(&rs.unit_classes, &u.class)?;
        let flags = resolve_flags(
            &u.flags,
            &rs.unit_type_flags,
            "unit type",
            crate::ids::UnitTypeFlagId,
        )?;
        unit_types.push(UnitType {
            label: label_or(&name, u.label),
            name,
            class,
            flags,
            veteran_levels: u.veteran_levels.max(1),
            hp: u.hp.max(1),
            move_rate: u.move_rate.max(0),
        });
    }
    rs.unit_types = Catalog::from_items(unit_types);

    check_len(terrain.terrains.len(), "terrain")?;
    let mut terrains = Vec::with_capacity(terrain.terrains.len());
    for (name, t) in terrain.terrains {
        let flags = resolve_flags(
            &t.flags,
            &rs.terrain_flags,
            "terrain",
            crate::ids::TerrainFlagId,
        )?;
        let native_to = t
            .native_to
            .iter()
            .map(|class| resolve_id(&rs.unit_classes, class))
            .collect::<Result<Vec<_>, _>>()?;
        terrains.push(Terrain {
            label: label_or(&name, t.label),
            name,
            class: t.class,
            flags,
            alterations: t.alterations,
            native_to,
        });
    }
    rs.terrains = Catalog::from_items(terrains);

    check_len(terrain.extras.len(), "extra")?;
    let mut extras = Vec::with_capacity(terrain.extras.len());
    for (name, e) in terrain.extras {
        extras.push(Extra {
            flags: resolve_flags(&e.flags, &rs.extra_flags, "extra", crate::ids::ExtraFlagId)?,
            base_flags: resolve_flags(
                &e.base_flags,
                &rs.base_flags,
                "base",
                crate::ids::BaseFlagId,
            )?,
            road_flags: resolve_flags(
                &e.road_flags,
                &rs.road_flags,
                "road",
                crate::ids::RoadFlagId,
            )?,
            label: label_or(&name, e.label),
            name,
        });
    }
    rs.extras = Catalog::from_items(extras);

    check_len(game.nations.len(), "nation")?;
    let mut nations = Vec::with_capacity(game.nations.len());
    for (name, n) in game.nations {
        let groups = n
            .groups
            .iter()
            .map(|group| resolve_id(&rs.nation_groups, group))
            .collect::<Result<Vec<_>, _>>()?;
        nations.push(Nation {
            label: label_or(&name, n.label),
            name,
            groups,
        });
    }
    rs.nations = Catalog::from_items(nations);

    debug!(
        ruleset = %rs.name,
        techs = rs.techs.len(),
        buildings = rs.buildings.len(),
        terrains = rs.terrains.len(),
        unit_types = rs.unit_types.len(),
        "ruleset compiled"
    );

    Ok(rs)
}
