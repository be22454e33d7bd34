//! Help text for requirements.

use std::fmt::Write as _;

use backbay_ruleset::{BuildingGenus, TerrainAlteration, TerrainClass};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{CityStatus, CityTile, Universal, UnitStateProp};
use crate::vector::RequirementVector;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Player-facing help: quiet requirements are hidden.
    #[default]
    Default,
    /// Everything, for ruleset authors.
    Actual,
}

/// Who a social-range requirement is about, with the verb form it takes.
struct Subject {
    noun: &'static str,
    second_person: bool,
}

impl Subject {
    fn of(range: ReqRange) -> Option<Self> {
        let (noun, second_person) = match range {
            ReqRange::Player => ("you", true),
            ReqRange::Team => ("a player on your team", false),
            ReqRange::Alliance => ("an allied player", false),
            ReqRange::World => ("some player in the world", false),
            _ => return None,
        };
        Some(Self {
            noun,
            second_person,
        })
    }

    fn verb(&self, plain: &str, third: &str) -> String {
        let verb = if self.second_person { plain } else { third };
        format!("{} {verb}", self.noun)
    }
}

fn tile_place(range: ReqRange) -> Option<&'static str> {
    match range {
        ReqRange::Local => Some("on the tile"),
        ReqRange::CAdjacent => Some("on the tile or a cardinally adjacent tile"),
        ReqRange::Adjacent => Some("on the tile or an adjacent tile"),
        ReqRange::City => Some("within the city radius"),
        ReqRange::TradeRoute => Some("within the radius of the city or a trade partner"),
        ReqRange::Continent => Some("on the continent"),
        _ => None,
    }
}

fn city_place(range: ReqRange) -> Option<&'static str> {
    match range {
        ReqRange::City => Some("in the city"),
        ReqRange::TradeRoute => Some("in the city or a trade partner"),
        _ => None,
    }
}

fn genus_text(genus: BuildingGenus) -> &'static str {
    match genus {
        BuildingGenus::GreatWonder => "great wonder",
        BuildingGenus::SmallWonder => "small wonder",
        BuildingGenus::Improvement => "improvement",
        BuildingGenus::Special => "special",
        BuildingGenus::Convert => "conversion",
    }
}

fn class_text(class: TerrainClass) -> &'static str {
    match class {
        TerrainClass::Land => "land",
        TerrainClass::Oceanic => "oceanic",
    }
}

fn alteration_text(alteration: TerrainAlteration) -> &'static str {
    match alteration {
        TerrainAlteration::CanIrrigate => "irrigation",
        TerrainAlteration::CanMine => "mining",
        TerrainAlteration::CanRoad => "road building",
        TerrainAlteration::CanTransform => "transformation",
    }
}

fn unit_state_text(prop: UnitStateProp) -> &'static str {
    match prop {
        UnitStateProp::Transported => "transported",
        UnitStateProp::Transporting => "transporting other units",
        UnitStateProp::OnNativeTile => "on native terrain",
        UnitStateProp::OnLivableTile => "on a tile where it can exist",
        UnitStateProp::HasHomeCity => "supported by a home city",
        UnitStateProp::OnDomesticTile => "on a tile its owner claims",
    }
}

fn city_tile_text(prop: CityTile) -> &'static str {
    match prop {
        CityTile::Center => "a city center",
        CityTile::Claimed => "a claimed tile",
        CityTile::ExtrasOwned => "a tile with owned extras",
        CityTile::Worked => "a worked tile",
        CityTile::SameContinent => "a tile on the city's continent",
    }
}

fn city_status_text(status: CityStatus) -> &'static str {
    match status {
        CityStatus::OwnedByOriginal => "owned by its founder",
        CityStatus::Starved => "starved",
        CityStatus::Disorder => "in disorder",
        CityStatus::Celebration => "celebrating",
    }
}

fn pick(present: bool, yes: String, no: String) -> String {
    if present {
        yes
    } else {
        no
    }
}

/// Requires/Prevented phrasing shared by the tile-like kinds.
fn on_tiles(req: &Requirement, what: &str) -> Option<String> {
    let place = tile_place(req.range)?;
    Some(pick(
        req.present,
        format!("Requires {what} {place}."),
        format!("Prevented by {what} {place}."),
    ))
}

fn sentence(engine: &ReqEngine<'_>, req: &Requirement) -> Option<String> {
    let rs = engine.ruleset();
    let name = req.source.translated_name(rs);
    let range = req.range;
    let present = req.present;

    let text = match req.source {
        Universal::None | Universal::Invalid => return None,

        Universal::Advance(_) => {
            if req.survives && range == ReqRange::World {
                pick(
                    present,
                    format!("Requires that the {name} technology has been known in the world."),
                    format!("Prevented once the {name} technology has been known in the world."),
                )
            } else {
                let who = Subject::of(range)?;
                pick(
                    present,
                    format!("Requires that {} the {name} technology.", who.verb("know", "knows")),
                    format!("Prevented if {} the {name} technology.", who.verb("know", "knows")),
                )
            }
        }
        Universal::TechFlag(_) => {
            let who = Subject::of(range)?;
            let know = who.verb("know", "knows");
            pick(
                present,
                format!("Requires that {know} a technology with the \"{name}\" flag."),
                format!("Prevented if {know} a technology with the \"{name}\" flag."),
            )
        }
        Universal::Government(_) if range == ReqRange::Player => pick(
            present,
            format!("Requires the {name} government."),
            format!("Not available under the {name} government."),
        ),
        Universal::Achievement(_) => {
            let who = Subject::of(range)?;
            let have = who.verb("have", "has");
            pick(
                present,
                format!("Requires that {have} the \"{name}\" achievement."),
                format!("Prevented if {have} the \"{name}\" achievement."),
            )
        }

        Universal::Improvement(_) => match range {
            ReqRange::Local => pick(
                present,
                format!("Applies only to the {name} building."),
                format!("Does not apply to the {name} building."),
            ),
            ReqRange::City | ReqRange::TradeRoute | ReqRange::Continent => {
                let place = match range {
                    ReqRange::Continent => "on the continent",
                    _ => city_place(range)?,
                };
                pick(
                    present,
                    format!("Requires a {name} {place}."),
                    format!("Prevented by a {name} {place}."),
                )
            }
            _ => {
                let who = Subject::of(range)?;
                if req.survives {
                    let built = who.verb("have ever built", "has ever built");
                    pick(
                        present,
                        format!("Requires that {built} the {name}."),
                        format!("Prevented if {built} the {name}."),
                    )
                } else {
                    let own = who.verb("own", "owns");
                    pick(
                        present,
                        format!("Requires that {own} the {name}."),
                        format!("Prevented if {own} the {name}."),
                    )
                }
            }
        },
        Universal::ImprGenus(genus) if range == ReqRange::Local => {
            let genus = genus_text(genus);
            pick(
                present,
                format!("Applies only to {genus} buildings."),
                format!("Does not apply to {genus} buildings."),
            )
        }

        Universal::Extra(_) => on_tiles(req, &format!("the {name} extra"))?,
        Universal::ExtraFlag(_) | Universal::BaseFlag(_) | Universal::RoadFlag(_) => {
            on_tiles(req, &format!("an extra with the \"{name}\" flag"))?
        }
        Universal::Terrain(_) => on_tiles(req, &format!("{name} terrain"))?,
        Universal::TerrainClass(class) => {
            on_tiles(req, &format!("{} terrain", class_text(class)))?
        }
        Universal::TerrainFlag(_) => on_tiles(req, &format!("terrain with the \"{name}\" flag"))?,
        Universal::TerrainAlter(alteration) if range == ReqRange::Local => {
            let alteration = alteration_text(alteration);
            pick(
                present,
                format!("Requires terrain where {alteration} is possible."),
                format!("Requires terrain where {alteration} is impossible."),
            )
        }
        Universal::CityTile(prop) => on_tiles(req, city_tile_text(prop))?,
        Universal::MaxUnitsOnTile(count) => match range {
            ReqRange::Local => pick(
                present,
                format!("Requires at most {count} units on the tile."),
                format!("Requires more than {count} units on the tile."),
            ),
            ReqRange::CAdjacent | ReqRange::Adjacent => {
                let place = tile_place(range)?;
                pick(
                    present,
                    format!("Requires at most {count} units {place}."),
                    format!("Requires more than {count} units on the tile and every neighbour."),
                )
            }
            _ => return None,
        },

        Universal::Good(_) if range == ReqRange::City => pick(
            present,
            format!("Requires {name} to be available in the city."),
            format!("Prevented if {name} is available in the city."),
        ),
        Universal::Nation(_) => {
            if req.survives && range == ReqRange::World {
                pick(
                    present,
                    format!("Requires that the {name} nation has been in play."),
                    format!("Prevented once the {name} nation has been in play."),
                )
            } else {
                let who = Subject::of(range)?;
                let play = who.verb("play", "plays");
                pick(
                    present,
                    format!("Requires that {play} the {name} nation."),
                    format!("Prevented if {play} the {name} nation."),
                )
            }
        }
        Universal::NationGroup(_) => {
            let who = Subject::of(range)?;
            let play = who.verb("play", "plays");
            pick(
                present,
                format!("Requires that {play} a nation in the {name} group."),
                format!("Prevented if {play} a nation in the {name} group."),
            )
        }
        Universal::Nationality(_) => {
            let place = city_place(range)?;
            pick(
                present,
                format!("Requires citizens of {name} nationality {place}."),
                format!("Prevented by citizens of {name} nationality {place}."),
            )
        }
        Universal::DiplRel(_) => {
            let (have, other) = match range {
                ReqRange::Local => (String::from("you have"), "the other player"),
                _ => (Subject::of(range)?.verb("have", "has"), "another player"),
            };
            pick(
                present,
                format!("Requires that {have} the \"{name}\" relation with {other}."),
                format!("Prevented if {have} the \"{name}\" relation with {other}."),
            )
        }
        Universal::AiLevel(_) if range == ReqRange::Player => pick(
            present,
            format!("Requires an AI player at {name} level."),
            format!("Not for AI players at {name} level."),
        ),
        Universal::MinTechs(count) => match range {
            ReqRange::Player => pick(
                present,
                format!("Requires at least {count} known technologies."),
                format!("Requires fewer than {count} known technologies."),
            ),
            ReqRange::World => pick(
                present,
                format!("Requires a player in the world with at least {count} technologies."),
                format!("Prevented once any player knows {count} technologies."),
            ),
            _ => return None,
        },
        Universal::MinCulture(points) => {
            let place = match range {
                ReqRange::City | ReqRange::TradeRoute => city_place(range)?,
                ReqRange::Player => "for your nation",
                ReqRange::Team => "for a nation on your team",
                ReqRange::Alliance => "for an allied nation",
                ReqRange::World => "for some nation in the world",
                _ => return None,
            };
            pick(
                present,
                format!("Requires at least {points} culture points {place}."),
                format!("Prevented by {points} or more culture points {place}."),
            )
        }
        Universal::MinForeignPct(pct) => {
            let place = city_place(range)?;
            pick(
                present,
                format!("Requires at least {pct}% foreign citizens {place}."),
                format!("Prevented by {pct}% or more foreign citizens {place}."),
            )
        }
        Universal::MinSize(size) => match range {
            ReqRange::City => pick(
                present,
                format!("Requires a city of size {size} or larger."),
                format!("Requires a city smaller than size {size}."),
            ),
            ReqRange::TradeRoute => pick(
                present,
                format!("Requires the city or a trade partner to be size {size} or larger."),
                format!("Requires the city and its trade partners to be smaller than size {size}."),
            ),
            _ => return None,
        },
        Universal::CityStatus(status) => {
            let status = city_status_text(status);
            match range {
                ReqRange::City => pick(
                    present,
                    format!("Requires the city to be {status}."),
                    format!("Requires the city not to be {status}."),
                ),
                ReqRange::TradeRoute => pick(
                    present,
                    format!("Requires the city or a trade partner to be {status}."),
                    format!("Requires neither the city nor a trade partner to be {status}."),
                ),
                _ => return None,
            }
        }

        Universal::UnitType(_) if range == ReqRange::Local => pick(
            present,
            format!("Requires a {name} unit."),
            format!("Not for {name} units."),
        ),
        Universal::UnitTypeFlag(_) if range == ReqRange::Local => pick(
            present,
            format!("Requires a unit with the \"{name}\" flag."),
            format!("Not for units with the \"{name}\" flag."),
        ),
        Universal::UnitClass(_) if range == ReqRange::Local => pick(
            present,
            format!("Requires a unit of the {name} class."),
            format!("Not for units of the {name} class."),
        ),
        Universal::UnitClassFlag(_) if range == ReqRange::Local => pick(
            present,
            format!("Requires a unit whose class has the \"{name}\" flag."),
            format!("Not for units whose class has the \"{name}\" flag."),
        ),
        Universal::MinVeteran(level) if range == ReqRange::Local => pick(
            present,
            format!("Requires a unit with veteran level {level} or higher."),
            format!("Requires a unit below veteran level {level}."),
        ),
        Universal::UnitState(prop) if range == ReqRange::Local => {
            let state = unit_state_text(prop);
            pick(
                present,
                format!("Requires the unit to be {state}."),
                format!("Requires the unit not to be {state}."),
            )
        }
        Universal::Activity(activity) if range == ReqRange::Local => {
            let activity = activity.name().to_lowercase();
            pick(
                present,
                format!("Requires the unit's activity to be {activity}."),
                format!("Requires the unit's activity not to be {activity}."),
            )
        }
        Universal::MinMoveFrags(frags) if range == ReqRange::Local => pick(
            present,
            format!("Requires at least {frags} move fragments left."),
            format!("Requires fewer than {frags} move fragments left."),
        ),
        Universal::MinHitPoints(hp) if range == ReqRange::Local => pick(
            present,
            format!("Requires at least {hp} hit points left."),
            format!("Requires fewer than {hp} hit points left."),
        ),
        Universal::Age(turns) => {
            let subject = match range {
                ReqRange::Local => "unit",
                ReqRange::City => "city",
                ReqRange::Player => "player",
                _ => return None,
            };
            pick(
                present,
                format!("Requires a {subject} at least {turns} turns old."),
                format!("Requires a {subject} less than {turns} turns old."),
            )
        }

        Universal::Action(_) if range == ReqRange::Local => pick(
            present,
            format!("Applies to the \"{name}\" action."),
            format!("Does not apply to the \"{name}\" action."),
        ),
        Universal::OutputType(output) if range == ReqRange::Local => {
            let output = output.name().to_lowercase();
            pick(
                present,
                format!("Applies only to {output} output."),
                format!("Does not apply to {output} output."),
            )
        }
        Universal::Specialist(_) if range == ReqRange::Local => pick(
            present,
            format!("Applies only to {name} specialists."),
            format!("Does not apply to {name} specialists."),
        ),
        Universal::VisionLayer(_) if range == ReqRange::Local => pick(
            present,
            format!("Applies to the {name} vision layer."),
            format!("Does not apply to the {name} vision layer."),
        ),
        Universal::NationalIntel(_) if range == ReqRange::Local => pick(
            present,
            format!("Applies to {name} intelligence."),
            format!("Does not apply to {name} intelligence."),
        ),

        Universal::MinYear(_) if range == ReqRange::World => pick(
            present,
            format!("Requires the game to have reached {name}."),
            format!("Requires the game not to have reached {name}."),
        ),
        Universal::MinCalFrag(frag) if range == ReqRange::World => pick(
            present,
            format!("Requires calendar fragment {frag} or later."),
            format!("Requires a calendar fragment before {frag}."),
        ),
        Universal::TopologyFlag(flag) if range == ReqRange::World => {
            let flag = flag.name();
            pick(
                present,
                format!("Requires a {flag} map."),
                format!("Not available on {flag} maps."),
            )
        }
        Universal::ServerSetting(_) if range == ReqRange::World => pick(
            present,
            format!("Requires the '{name}' server setting to be enabled."),
            format!("Requires the '{name}' server setting to be disabled."),
        ),

        _ => return None,
    };
    Some(text)
}

/// One help sentence for the requirement, or `None` when there is nothing to
/// say: a quiet requirement at [`Verbosity::Default`], or a kind/range pair
/// with no phrasing.
pub fn req_text(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    verbosity: Verbosity,
) -> Option<String> {
    if req.quiet && verbosity == Verbosity::Default {
        return None;
    }
    let text = sentence(engine, req);
    if text.is_none() && verbosity == Verbosity::Default && !req.is_invalid() {
        warn!(kind = %req.kind(), range = %req.range, "no help text for requirement");
    }
    text
}

/// Bullet list of the vector's renderable members, one per line.
pub fn vector_text(
    engine: &ReqEngine<'_>,
    reqs: &RequirementVector,
    verbosity: Verbosity,
) -> String {
    let mut out = String::new();
    for text in reqs.iter().filter_map(|req| req_text(engine, req, verbosity)) {
        let _ = writeln!(out, "* {text}");
    }
    out
}
