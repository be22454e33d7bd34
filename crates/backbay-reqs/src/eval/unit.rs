use super::TriState;
use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{Universal, UnitStateProp};
use crate::world::{GameWorld, Unit};

pub(super) fn eval(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
    let rs = engine.ruleset();
    match req.source {
        Universal::UnitType(unit_type) => TriState::from_bool(need!(ctx.unit_type()) == unit_type),
        Universal::UnitTypeFlag(flag) => {
            TriState::from_bool(rs.unit_type_has_flag(need!(ctx.unit_type()), flag))
        }
        Universal::UnitClass(class) => {
            TriState::from_bool(rs.unit_class_of(need!(ctx.unit_type())) == Some(class))
        }
        Universal::UnitClassFlag(flag) => {
            TriState::from_bool(rs.unit_type_class_has_flag(need!(ctx.unit_type()), flag))
        }
        Universal::MinVeteran(level) => TriState::from_bool(need!(ctx.unit).veteran >= level),
        Universal::Activity(activity) => TriState::from_bool(need!(ctx.unit).activity == activity),
        Universal::MinMoveFrags(min) => TriState::from_bool(need!(ctx.unit).moves_left >= min),
        Universal::MinHitPoints(min) => TriState::from_bool(need!(ctx.unit).hp >= min),
        Universal::UnitState(property) => unit_state(engine, ctx, property),
        Universal::Age(min) => age(engine, req, ctx, min),
        _ => engine.unsupported(req),
    }
}

fn unit_state(engine: &ReqEngine<'_>, ctx: &ReqContext<'_>, property: UnitStateProp) -> TriState {
    let unit = need!(ctx.unit);
    match property {
        UnitStateProp::Transported => TriState::from_bool(unit.transported_by.is_some()),
        UnitStateProp::Transporting => TriState::from_bool(!unit.transporting.is_empty()),
        UnitStateProp::HasHomeCity => TriState::from_bool(unit.homecity.is_some()),
        UnitStateProp::OnNativeTile => {
            let world = need!(ctx.world);
            TriState::from_bool(need!(on_native_tile(engine, world, unit)))
        }
        UnitStateProp::OnLivableTile => {
            let world = need!(ctx.world);
            if need!(on_native_tile(engine, world, unit)) {
                return TriState::Yes;
            }
            let tile = need!(world.tile(unit.tile));
            TriState::from_bool(tile.city_center.is_some())
        }
        UnitStateProp::OnDomesticTile => {
            let world = need!(ctx.world);
            let tile = need!(world.tile(unit.tile));
            TriState::from_bool(tile.owner == Some(unit.owner))
        }
    }
}

fn on_native_tile(engine: &ReqEngine<'_>, world: &GameWorld, unit: &Unit) -> Option<bool> {
    let rs = engine.ruleset();
    let class = rs.unit_class_of(unit.unit_type)?;
    let tile = world.tile(unit.tile)?;
    Some(rs.is_native_terrain(class, tile.terrain))
}

/// Turns elapsed since the unit, city or player came into being.
fn age(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>, min: i32) -> TriState {
    let world = need!(ctx.world);
    let turn = world.info.turn;
    let born = match req.range {
        ReqRange::Local => need!(ctx.unit).birth_turn,
        ReqRange::City => need!(ctx.city).founded_turn,
        ReqRange::Player => need!(ctx.player).birth_turn,
        _ => return engine.unsupported(req),
    };
    TriState::from_bool(turn - born >= min)
}
