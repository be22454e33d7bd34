use backbay_ruleset::TileIndex;

use super::TriState;
use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{CityTile, Universal};
use crate::world::{GameWorld, Tile};

pub(super) fn eval(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
    let rs = engine.ruleset();
    match req.source {
        Universal::Terrain(terrain) => over_tiles(engine, req, ctx, |t| t.terrain == terrain),
        Universal::TerrainClass(class) => over_tiles(engine, req, ctx, |t| {
            rs.terrain_class(t.terrain) == Some(class)
        }),
        Universal::TerrainFlag(flag) => {
            over_tiles(engine, req, ctx, |t| rs.terrain_has_flag(t.terrain, flag))
        }
        Universal::TerrainAlter(alteration) => {
            over_tiles(engine, req, ctx, |t| rs.terrain_allows(t.terrain, alteration))
        }
        Universal::Extra(extra) => over_tiles(engine, req, ctx, |t| t.has_extra(extra)),
        Universal::ExtraFlag(flag) => over_tiles(engine, req, ctx, |t| {
            t.extras.iter().any(|e| rs.extra_has_flag(*e, flag))
        }),
        Universal::BaseFlag(flag) => over_tiles(engine, req, ctx, |t| {
            t.extras.iter().any(|e| rs.extra_has_base_flag(*e, flag))
        }),
        Universal::RoadFlag(flag) => over_tiles(engine, req, ctx, |t| {
            t.extras.iter().any(|e| rs.extra_has_road_flag(*e, flag))
        }),
        Universal::MaxUnitsOnTile(max) => over_tiles(engine, req, ctx, |t| {
            i32::try_from(t.units.len()).is_ok_and(|count| count <= max)
        }),
        Universal::CityTile(property) => city_tile(engine, req, ctx, property),
        _ => engine.unsupported(req),
    }
}

/// Existential tile test over the tiles the requirement's range covers.
fn over_tiles(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    test: impl Fn(&Tile) -> bool,
) -> TriState {
    let world = need!(ctx.world);
    match req.range {
        ReqRange::Local => TriState::from_bool(test(need!(ctx.tile_data()))),
        ReqRange::CAdjacent | ReqRange::Adjacent => {
            let center = need!(ctx.tile);
            let tiles = neighbourhood(world, center, req.range);
            TriState::from_bool(any_tile(world, &tiles, &test))
        }
        ReqRange::City => {
            let city = need!(ctx.city);
            TriState::from_bool(any_tile(world, &world.city_tiles(city), &test))
        }
        ReqRange::TradeRoute => {
            let city = need!(ctx.city);
            let found = std::iter::once(city)
                .chain(world.trade_partners(city))
                .any(|c| any_tile(world, &world.city_tiles(c), &test));
            TriState::from_bool(found)
        }
        _ => engine.unsupported(req),
    }
}

/// The centre tile plus its cardinal or full neighbourhood.
fn neighbourhood(world: &GameWorld, center: TileIndex, range: ReqRange) -> Vec<TileIndex> {
    let geometry = &world.map.geometry;
    let mut tiles = vec![center];
    if range == ReqRange::CAdjacent {
        tiles.extend(geometry.cardinal_neighbors(center));
    } else {
        tiles.extend(geometry.adjacent_neighbors(center));
    }
    tiles
}

fn any_tile(world: &GameWorld, tiles: &[TileIndex], test: &impl Fn(&Tile) -> bool) -> bool {
    tiles
        .iter()
        .filter_map(|index| world.tile(*index))
        .any(test)
}

fn city_tile(
    engine: &ReqEngine<'_>,
    req: &Requirement,
    ctx: &ReqContext<'_>,
    property: CityTile,
) -> TriState {
    match property {
        CityTile::Center => over_tiles(engine, req, ctx, |t| t.city_center.is_some()),
        CityTile::Claimed => over_tiles(engine, req, ctx, |t| t.owner.is_some()),
        CityTile::ExtrasOwned => over_tiles(engine, req, ctx, |t| t.extras_owner.is_some()),
        CityTile::Worked => over_tiles(engine, req, ctx, |t| t.worked_by.is_some()),
        CityTile::SameContinent => {
            let world = need!(ctx.world);
            let city = need!(ctx.city);
            let continent = need!(world.city_continent(city));
            over_tiles(engine, req, ctx, |t| t.continent == continent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::eval::ProblemType;
    use crate::test_support::{ruleset, small_world, CITY_TILE};
    use crate::universal::UniversalKind;

    fn terrain(rs: &backbay_ruleset::Ruleset, name: &str) -> Universal {
        Universal::from_rule_name(UniversalKind::Terrain, name, rs)
    }

    #[test]
    fn local_terrain_needs_a_tile() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let world = small_world(&rs);
        let req = Requirement::new(terrain(&rs, "Grassland"), ReqRange::Local, true);

        let no_tile = ReqContext::new().with_world(&world);
        assert_eq!(engine.eval_req(&req, &no_tile), TriState::Maybe);

        let ctx = no_tile.with_tile(CITY_TILE);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);

        let ocean = Requirement::new(terrain(&rs, "Ocean"), ReqRange::Local, true);
        assert_eq!(engine.eval_req(&ocean, &ctx), TriState::No);
        assert!(engine.is_req_active(&ocean.negated(), &ctx, ProblemType::Certain));
    }

    #[test]
    fn adjacent_ranges_look_at_neighbours() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let ocean_id = rs.terrains.id_by_name("Ocean").unwrap();
        let geometry = world.map.geometry;
        let (x, y) = geometry.coords(CITY_TILE);
        // diagonal neighbour only
        let diagonal = geometry.index_of(x + 1, y + 1).unwrap();
        world.map.tile_mut(diagonal).unwrap().terrain = ocean_id;

        let ctx = ReqContext::new().with_world(&world).with_tile(CITY_TILE);
        let ocean = terrain(&rs, "Ocean");
        let adjacent = Requirement::new(ocean, ReqRange::Adjacent, true);
        let cardinal = Requirement::new(ocean, ReqRange::CAdjacent, true);
        assert_eq!(engine.eval_req(&adjacent, &ctx), TriState::Yes);
        assert_eq!(engine.eval_req(&cardinal, &ctx), TriState::No);
    }

    #[test]
    fn city_range_scans_the_work_radius() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let river = rs.extras.id_by_name("River").unwrap();
        let geometry = world.map.geometry;
        let (x, y) = geometry.coords(CITY_TILE);
        let inside = geometry.index_of(x + 2, y + 1).unwrap();
        world.map.tile_mut(inside).unwrap().extras.push(river);

        let river_flag = Universal::from_rule_name(UniversalKind::RoadFlag, "River", &rs);
        let req = Requirement::new(river_flag, ReqRange::City, true);

        let no_city = ReqContext::new().with_world(&world);
        assert_eq!(engine.eval_req(&req, &no_city), TriState::Maybe);

        let ctx = no_city.with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);
    }

    #[test]
    fn trade_route_includes_partner_cities() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let mut world = small_world(&rs);
        let ocean_id = rs.terrains.id_by_name("Ocean").unwrap();
        let partner_tile = world.cities[1].tile;
        world.map.tile_mut(partner_tile).unwrap().terrain = ocean_id;

        let req = Requirement::new(terrain(&rs, "Ocean"), ReqRange::TradeRoute, true);
        let city_req = Requirement::new(terrain(&rs, "Ocean"), ReqRange::City, true);
        let ctx = ReqContext::new().with_world(&world).with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&city_req, &ctx), TriState::No);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::No);

        let partner_id = world.cities[1].id;
        world.cities[0].trade_partners.push(partner_id);
        let ctx = ReqContext::new().with_world(&world).with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&req, &ctx), TriState::Yes);
    }

    #[test]
    fn city_tile_properties() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let world = small_world(&rs);
        let ctx = ReqContext::new().with_world(&world).with_tile(CITY_TILE);

        let center = Requirement::new(Universal::CityTile(CityTile::Center), ReqRange::Local, true);
        assert_eq!(engine.eval_req(&center, &ctx), TriState::Yes);

        let same = Requirement::new(
            Universal::CityTile(CityTile::SameContinent),
            ReqRange::Local,
            true,
        );
        assert_eq!(engine.eval_req(&same, &ctx), TriState::Maybe);
        let ctx = ctx.with_city(&world.cities[0]);
        assert_eq!(engine.eval_req(&same, &ctx), TriState::Yes);
    }

    #[test]
    fn max_units_on_tile_counts_stack() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let world = small_world(&rs);
        let ctx = ReqContext::new().with_world(&world).with_tile(CITY_TILE);
        let one = Requirement::new(Universal::MaxUnitsOnTile(1), ReqRange::Local, true);
        let zero = Requirement::new(Universal::MaxUnitsOnTile(0), ReqRange::Local, true);
        assert_eq!(engine.eval_req(&one, &ctx), TriState::Yes);
        assert_eq!(engine.eval_req(&zero, &ctx), TriState::No);
    }
}
