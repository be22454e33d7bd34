use super::TriState;
use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::requirement::Requirement;
use crate::universal::Universal;

pub(super) fn eval(engine: &ReqEngine<'_>, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
    let world = need!(ctx.world);
    match req.source {
        Universal::MinYear(year) => TriState::from_bool(world.info.year >= year),
        Universal::MinCalFrag(fragment) => {
            TriState::from_bool(world.info.calendar_fragment >= fragment)
        }
        Universal::TopologyFlag(flag) => {
            TriState::from_bool(world.map.geometry.topology.contains(flag))
        }
        Universal::ServerSetting(setting) => {
            TriState::from_bool(world.info.setting_enabled(engine.ruleset(), setting))
        }
        _ => engine.unsupported(req),
    }
}
