use super::TriState;
use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{DiplRel, Universal};
use crate::world::{City, Player};

pub(super) fn eval(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
    let rs = engine.ruleset();
    match req.source {
        Universal::Advance(tech) => {
            if req.survives {
                let world = need!(ctx.world);
                return TriState::from_bool(world.tech_ever_known(tech));
            }
            over_players(engine, req, ctx, |p| p.knows_tech(tech))
        }
        Universal::TechFlag(flag) => over_players(engine, req, ctx, |p| {
            p.known_techs.iter().any(|t| rs.tech_has_flag(*t, flag))
        }),
        Universal::Government(gov) => over_players(engine, req, ctx, |p| p.government == gov),
        Universal::Achievement(achievement) => {
            over_players(engine, req, ctx, |p| p.has_achievement(achievement))
        }
        Universal::Nation(nation) => {
            if req.survives {
                let world = need!(ctx.world);
                return TriState::from_bool(world.nation_ever_in_play(nation));
            }
            over_players(engine, req, ctx, |p| p.nation == nation)
        }
        Universal::NationGroup(group) => {
            over_players(engine, req, ctx, |p| rs.nation_in_group(p.nation, group))
        }
        Universal::AiLevel(level) => over_players(engine, req, ctx, |p| p.ai_level == Some(level)),
        Universal::MinTechs(min) => match req.range {
            ReqRange::World => {
                let world = need!(ctx.world);
                TriState::from_bool(count_at_least(world.global_advance_count(), min))
            }
            _ => over_players(engine, req, ctx, |p| {
                count_at_least(p.known_techs.len(), min)
            }),
        },
        Universal::MinCulture(min) => min_culture(engine, req, ctx, min),
        Universal::DiplRel(rel) => diplrel(engine, req, ctx, rel),
        _ => engine.unsupported(req),
    }
}

fn count_at_least(count: usize, min: i32) -> bool {
    i64::try_from(count).map_or(true, |count| count >= i64::from(min))
}

/// Existential player test over Player, Team, Alliance or World range. The
/// world is only needed past Player range.
fn over_players(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    test: impl Fn(&Player) -> bool,
) -> TriState {
    match req.range {
        ReqRange::Player => TriState::from_bool(test(need!(ctx.player))),
        ReqRange::Team | ReqRange::Alliance => {
            let world = need!(ctx.world);
            let player = need!(ctx.player);
            let found = world
                .players_in_range(player.id, req.range)
                .into_iter()
                .any(&test);
            TriState::from_bool(found)
        }
        ReqRange::World => {
            let world = need!(ctx.world);
            TriState::from_bool(world.alive_players().any(test))
        }
        _ => engine.unsupported(req),
    }
}

fn min_culture(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>, min: i32) -> TriState {
    let city_test = |c: &City| c.culture >= min;
    match req.range {
        ReqRange::City => TriState::from_bool(city_test(need!(ctx.city))),
        ReqRange::TradeRoute => {
            let city = need!(ctx.city);
            if city_test(city) {
                return TriState::Yes;
            }
            let world = need!(ctx.world);
            TriState::from_bool(world.trade_partners(city).any(city_test))
        }
        _ => {
            let world = need!(ctx.world);
            over_players(engine, req, ctx, |p| world.player_culture(p) >= min)
        }
    }
}

fn diplrel(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    rel: DiplRel,
) -> TriState {
    let world = need!(ctx.world);
    let player = need!(ctx.player);
    let with_anyone =
        |p: &Player| world.alive_players().any(|other| world.has_diplrel(p.id, other.id, rel));
    match req.range {
        ReqRange::Local => {
            let other = need!(ctx.other_player);
            TriState::from_bool(world.has_diplrel(player.id, other.id, rel))
        }
        ReqRange::Player => TriState::from_bool(with_anyone(player)),
        ReqRange::Team | ReqRange::Alliance => {
            let found = world
                .players_in_range(player.id, req.range)
                .into_iter()
                .any(with_anyone);
            TriState::from_bool(found)
        }
        ReqRange::World => TriState::from_bool(world.alive_players().any(with_anyone)),
        _ => engine.unsupported(req),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::eval::ProblemType;
    use crate::test_support::{ruleset, small_world};
    use crate::universal::UniversalKind;
    use crate::world::Diplomacy;
    use backbay_ruleset::PlayerId;

    #[test]
    fn tech_ranges() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let writing = rs.techs.id_by_name("Writing").unwrap();
        world.players[1].known_techs.push(writing);

        let tech = Universal::Advance(writing);
        let ctx = ReqContext::new().with_world(&world).with_player(&world.players[0]);
        let player = Requirement::new(tech, ReqRange::Player, true);
        let team = Requirement::new(tech, ReqRange::Team, true);
        let world_req = Requirement::new(tech, ReqRange::World, true);
        assert_eq!(engine.eval_req(&player, &ctx), TriState::No);
        assert_eq!(engine.eval_req(&team, &ctx), TriState::No);
        assert_eq!(engine.eval_req(&world_req, &ctx), TriState::Yes);

        let no_player = ReqContext::new().with_world(&world);
        assert_eq!(engine.eval_req(&player, &no_player), TriState::Maybe);
        assert_eq!(engine.eval_req(&world_req, &no_player), TriState::Yes);
    }

    #[test]
    fn surviving_tech_uses_history() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let flight = rs.techs.id_by_name("Flight").unwrap();
        let req = Requirement::new(Universal::Advance(flight), ReqRange::World, true)
            .with_survives(true);
        let ctx = ReqContext::new().with_world(&world);
        assert!(!engine.is_req_active(&req, &ctx, ProblemType::Certain));

        world.history.techs_ever_known.push(flight);
        let ctx = ReqContext::new().with_world(&world);
        assert!(engine.is_req_active(&req, &ctx, ProblemType::Certain));
    }

    #[test]
    fn tech_flag_matches_any_known_tech() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        world.players[0]
            .known_techs
            .push(rs.techs.id_by_name("Construction").unwrap());
        let bridge = Universal::from_rule_name(UniversalKind::TechFlag, "Bridge", &rs);
        let req = Requirement::new(bridge, ReqRange::Player, true);
        let ctx = ReqContext::new().with_player(&world.players[0]);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);
    }

    #[test]
    fn government_and_nation_group() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let world = small_world(&rs);
        let ctx = ReqContext::new().with_player(&world.players[0]);

        let monarchy = Universal::from_rule_name(UniversalKind::Government, "Monarchy", &rs);
        let req = Requirement::new(monarchy, ReqRange::Player, true);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);

        let ancient = Universal::from_rule_name(UniversalKind::NationGroup, "Ancient", &rs);
        let req = Requirement::new(ancient, ReqRange::Player, true);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);

        let medieval = Universal::from_rule_name(UniversalKind::NationGroup, "Medieval", &rs);
        let req = Requirement::new(medieval, ReqRange::World, true);
        let ctx = ctx.with_world(&world);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::No);
    }

    #[test]
    fn diplrel_local_needs_both_players() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        world.players[0].diplomacy.push(Diplomacy {
            with: PlayerId(1),
            state: DiplRel::War,
            gives_shared_vision: false,
            has_embassy: false,
            has_casus_belli: false,
        });
        let war = Requirement::new(Universal::DiplRel(DiplRel::War), ReqRange::Local, true);

        let one = ReqContext::new().with_world(&world).with_player(&world.players[0]);
        assert_eq!(engine.eval_req(&war, &one), TriState::Maybe);

        let both = one.with_other_player(&world.players[1]);
        assert_eq!(engine.eval_req(&war, &both), TriState::Yes);

        let player_range = Requirement::new(Universal::DiplRel(DiplRel::War), ReqRange::Player, true);
        assert_eq!(engine.eval_req(&player_range, &one), TriState::Yes);

        let peace = Requirement::new(Universal::DiplRel(DiplRel::Peace), ReqRange::World, true);
        assert_eq!(engine.eval_req(&peace, &one), TriState::No);
    }

    #[test]
    fn min_culture_sums_cities_at_player_range() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        world.players[0].culture = 40;
        world.cities[0].culture = 70;
        let ctx = ReqContext::new()
            .with_world(&world)
            .with_player(&world.players[0])
            .with_city(&world.cities[0]);

        let player = Requirement::new(Universal::MinCulture(100), ReqRange::Player, true);
        let city = Requirement::new(Universal::MinCulture(100), ReqRange::City, true);
        assert_eq!(engine.eval_req(&player, &ctx), TriState::Yes);
        assert_eq!(engine.eval_req(&city, &ctx), TriState::No);
    }

    #[test]
    fn min_techs_world_counts_distinct_techs() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let alphabet = rs.techs.id_by_name("Alphabet").unwrap();
        let writing = rs.techs.id_by_name("Writing").unwrap();
        world.players[0].known_techs = vec![alphabet];
        world.players[1].known_techs = vec![alphabet, writing];
        let ctx = ReqContext::new().with_world(&world).with_player(&world.players[0]);

        let world_two = Requirement::new(Universal::MinTechs(2), ReqRange::World, true);
        let player_two = Requirement::new(Universal::MinTechs(2), ReqRange::Player, true);
        assert_eq!(engine.eval_req(&world_two, &ctx), TriState::Yes);
        assert_eq!(engine.eval_req(&player_two, &ctx), TriState::No);
    }
}
