use backbay_ruleset::BuildingId;

use super::TriState;
use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{CityStatus, Universal};
use crate::world::{City, GameWorld, Player};

pub(super) fn eval(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
    let rs = engine.ruleset();
    match req.source {
        Universal::Improvement(building) => improvement(engine, req, ctx, building),
        Universal::ImprGenus(genus) => {
            let building = need!(ctx.building);
            TriState::from_bool(rs.building_genus(building) == Some(genus))
        }
        Universal::Good(good) => over_cities(engine, req, ctx, |c| c.goods.contains(&good)),
        Universal::MinSize(min) => over_cities(engine, req, ctx, |c| c.size >= min),
        Universal::MinForeignPct(min) => {
            over_cities(engine, req, ctx, |c| c.foreign_percent() >= min)
        }
        Universal::Nationality(nation) => {
            let world = need!(ctx.world);
            over_cities(engine, req, ctx, |c| {
                c.citizens.iter().any(|(pid, count)| {
                    *count > 0 && world.player(*pid).is_some_and(|p| p.nation == nation)
                })
            })
        }
        Universal::CityStatus(status) => over_cities(engine, req, ctx, |c| match status {
            CityStatus::OwnedByOriginal => c.owner == c.original_owner,
            CityStatus::Starved => c.status.starved,
            CityStatus::Disorder => c.status.disorder,
            CityStatus::Celebration => c.status.celebration,
        }),
        Universal::Specialist(specialist) => {
            TriState::from_bool(need!(ctx.specialist) == specialist)
        }
        Universal::OutputType(output) => TriState::from_bool(need!(ctx.output_type) == output),
        Universal::Action(action) => TriState::from_bool(need!(ctx.action) == action),
        Universal::VisionLayer(layer) => TriState::from_bool(need!(ctx.vision_layer) == layer),
        Universal::NationalIntel(nintel) => TriState::from_bool(need!(ctx.nintel) == nintel),
        _ => engine.unsupported(req),
    }
}

/// City test at City range, or over the city and its trade partners.
fn over_cities(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    test: impl Fn(&City) -> bool,
) -> TriState {
    let city = need!(ctx.city);
    match req.range {
        ReqRange::City => TriState::from_bool(test(city)),
        ReqRange::TradeRoute => {
            if test(city) {
                return TriState::Yes;
            }
            let world = need!(ctx.world);
            TriState::from_bool(world.trade_partners(city).any(test))
        }
        _ => engine.unsupported(req),
    }
}

fn player_has_building(
    world: &GameWorld,
    player: &Player,
    building: BuildingId,
    survives: bool,
) -> bool {
    if survives {
        player.ever_built.contains(&building)
    } else {
        world.num_player_buildings(player.id, building) > 0
    }
}

fn improvement(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    building: BuildingId,
) -> TriState {
    match req.range {
        ReqRange::Local => TriState::from_bool(need!(ctx.building) == building),
        ReqRange::City | ReqRange::TradeRoute => {
            over_cities(engine, req, ctx, |c| c.has_building(building))
        }
        ReqRange::Continent => {
            let world = need!(ctx.world);
            let continent = match (ctx.tile_data(), ctx.city) {
                (Some(tile), _) => tile.continent,
                (None, Some(city)) => need!(world.city_continent(city)),
                (None, None) => return TriState::Maybe,
            };
            TriState::from_bool(world.num_continent_buildings(continent, building) > 0)
        }
        ReqRange::Player | ReqRange::Team | ReqRange::Alliance => {
            let world = need!(ctx.world);
            let player = need!(ctx.player);
            let found = world
                .players_in_range(player.id, req.range)
                .into_iter()
                .any(|p| player_has_building(world, p, building, req.survives));
            TriState::from_bool(found)
        }
        ReqRange::World => {
            let world = need!(ctx.world);
            let count = if req.survives {
                world.num_world_buildings_total(building)
            } else {
                world.num_world_buildings(building)
            };
            TriState::from_bool(count > 0)
        }
        _ => engine.unsupported(req),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use backbay_ruleset::{BuildingGenus, PlayerId};

    use super::*;
    use crate::config::EngineConfig;
    use crate::eval::ProblemType;
    use crate::test_support::{ruleset, small_world};
    use crate::universal::UniversalKind;

    #[test]
    fn building_at_city_and_player_range() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let temple = rs.buildings.id_by_name("Temple").unwrap();
        world.cities[0].buildings.push(temple);

        let city_req = Requirement::new(Universal::Improvement(temple), ReqRange::City, true);
        let player_req = Requirement::new(Universal::Improvement(temple), ReqRange::Player, true);

        let own = ReqContext::new()
            .with_world(&world)
            .with_player(&world.players[0])
            .with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&city_req, &own), TriState::Yes);
        assert_eq!(engine.eval_req(&player_req, &own), TriState::Yes);

        let other = ReqContext::new()
            .with_world(&world)
            .with_player(&world.players[1])
            .with_city(&world.cities[1]);
        assert_eq!(engine.eval_req(&city_req, &other), TriState::No);
        assert_eq!(engine.eval_req(&player_req, &other), TriState::No);
    }

    #[test]
    fn destroyed_wonder_survives_only_with_flag() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let colossus = rs.buildings.id_by_name("Colossus").unwrap();
        world.history.buildings_built.push(colossus);
        world.players[0].ever_built.push(colossus);

        let ctx = ReqContext::new().with_world(&world).with_player(&world.players[0]);
        let current = Requirement::new(Universal::Improvement(colossus), ReqRange::World, true);
        let ever = current.with_survives(true);
        assert!(!engine.is_req_active(&current, &ctx, ProblemType::Certain));
        assert!(engine.is_req_active(&ever, &ctx, ProblemType::Certain));

        let player_ever =
            Requirement::new(Universal::Improvement(colossus), ReqRange::Player, true)
                .with_survives(true);
        assert!(engine.is_req_active(&player_ever, &ctx, ProblemType::Certain));
    }

    #[test]
    fn continent_range_uses_city_location() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let walls = rs.buildings.id_by_name("City Walls").unwrap();
        world.cities[1].buildings.push(walls);
        let req = Requirement::new(Universal::Improvement(walls), ReqRange::Continent, true);

        let ctx = ReqContext::new().with_world(&world).with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);
        assert_eq!(
            engine.eval_req(&req, &ReqContext::new().with_world(&world)),
            TriState::Maybe
        );
    }

    #[test]
    fn genus_checks_the_context_building() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let pyramids = rs.buildings.id_by_name("Pyramids").unwrap();
        let req = Requirement::new(
            Universal::ImprGenus(BuildingGenus::GreatWonder),
            ReqRange::Local,
            true,
        );
        assert_eq!(engine.eval_req(&req, &ReqContext::new()), TriState::Maybe);
        let ctx = ReqContext::new().with_building(pyramids);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);
    }

    #[test]
    fn size_and_status_over_trade_routes() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        world.cities[0].size = 3;
        world.cities[1].size = 9;
        world.cities[1].status.celebration = true;
        let partner_id = world.cities[1].id;
        world.cities[0].trade_partners.push(partner_id);
        let ctx = ReqContext::new().with_world(&world).with_city(&world.cities[0]);

        let big = Universal::MinSize(8);
        assert_eq!(
            engine.eval_req(&Requirement::new(big, ReqRange::City, true), &ctx),
            TriState::No
        );
        assert_eq!(
            engine.eval_req(&Requirement::new(big, ReqRange::TradeRoute, true), &ctx),
            TriState::Yes
        );

        let party = Universal::CityStatus(CityStatus::Celebration);
        assert_eq!(
            engine.eval_req(&Requirement::new(party, ReqRange::TradeRoute, true), &ctx),
            TriState::Yes
        );
        let original = Universal::CityStatus(CityStatus::OwnedByOriginal);
        assert_eq!(
            engine.eval_req(&Requirement::new(original, ReqRange::City, true), &ctx),
            TriState::Yes
        );
    }

    #[test]
    fn nationality_reads_citizen_owners() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        world.cities[0].citizens = BTreeMap::from([(PlayerId(0), 2), (PlayerId(1), 1)]);
        let greek = world.players[1].nation;
        let req = Requirement::new(Universal::Nationality(greek), ReqRange::City, true);

        let ctx = ReqContext::new().with_world(&world).with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);

        let english = Universal::from_rule_name(UniversalKind::Nationality, "English", &rs);
        let req = Requirement::new(english, ReqRange::City, true);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::No);
    }

    #[test]
    fn local_context_kinds() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let conquer = rs.actions.id_by_name("Conquer City").unwrap();
        let found = rs.actions.id_by_name("Found City").unwrap();
        let req = Requirement::new(Universal::Action(conquer), ReqRange::Local, true);
        assert_eq!(engine.eval_req(&req, &ReqContext::new()), TriState::Maybe);
        assert_eq!(
            engine.eval_req(&req, &ReqContext::new().with_action(conquer)),
            TriState::Yes
        );
        assert_eq!(
            engine.eval_req(&req, &ReqContext::new().with_action(found)),
            TriState::No
        );
    }
}
