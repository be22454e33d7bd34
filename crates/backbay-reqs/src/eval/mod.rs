//! Range-aware evaluation of requirements against a partially known context.
//!
//! Each universal kind has one evaluator; missing context degrades to
//! [`TriState::Maybe`], which the caller's [`ProblemType`] then resolves.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::context::ReqContext;
use crate::engine::ReqEngine;
use crate::requirement::{range_is_legal, survives_is_legal, Requirement};
use crate::universal::Universal;
use crate::vector::RequirementVector;

/// Unwrap a context field or answer `Maybe`.
macro_rules! need {
    ($value:expr) => {
        match $value {
            Some(value) => value,
            None => return $crate::eval::TriState::Maybe,
        }
    };
}

mod city;
mod global;
mod player;
mod spatial;
mod unit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    Yes,
    No,
    Maybe,
}

impl TriState {
    pub fn from_bool(value: bool) -> Self {
        if value {
            TriState::Yes
        } else {
            TriState::No
        }
    }

    /// Existential combination: `Yes` if any input is `Yes`, otherwise
    /// `Maybe` if any is `Maybe`. Stops at the first `Yes`.
    pub fn any<I: IntoIterator<Item = TriState>>(results: I) -> TriState {
        let mut out = TriState::No;
        for result in results {
            match result {
                TriState::Yes => return TriState::Yes,
                TriState::Maybe => out = TriState::Maybe,
                TriState::No => {}
            }
        }
        out
    }

    /// Resolve against the requirement's sign, substituting the policy's
    /// answer for `Maybe`.
    pub fn is_satisfied(self, present: bool, problem: ProblemType) -> bool {
        match self {
            TriState::Yes => present,
            TriState::No => !present,
            TriState::Maybe => problem == ProblemType::Possible,
        }
    }
}

/// How an unresolved `Maybe` is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Anything not ruled out counts as satisfied.
    Possible,
    /// Only what is known to hold counts as satisfied.
    #[default]
    Certain,
}

impl<'r> ReqEngine<'r> {
    /// Three-valued test of the requirement's universal over its range,
    /// ignoring `present`.
    pub fn eval_req(&self, req: &Requirement, ctx: &ReqContext<'_>) -> TriState {
        if !range_is_legal(req.kind(), req.range) {
            return self.unsupported(req);
        }
        match req.source {
            Universal::None => TriState::Yes,
            Universal::Invalid => TriState::No,

            Universal::Terrain(_)
            | Universal::TerrainClass(_)
            | Universal::TerrainFlag(_)
            | Universal::TerrainAlter(_)
            | Universal::Extra(_)
            | Universal::ExtraFlag(_)
            | Universal::BaseFlag(_)
            | Universal::RoadFlag(_)
            | Universal::MaxUnitsOnTile(_)
            | Universal::CityTile(_) => spatial::eval(self, req, ctx),

            Universal::Advance(_)
            | Universal::TechFlag(_)
            | Universal::Government(_)
            | Universal::Achievement(_)
            | Universal::Nation(_)
            | Universal::NationGroup(_)
            | Universal::AiLevel(_)
            | Universal::MinTechs(_)
            | Universal::MinCulture(_)
            | Universal::DiplRel(_) => player::eval(self, req, ctx),

            Universal::Improvement(_)
            | Universal::ImprGenus(_)
            | Universal::Good(_)
            | Universal::MinSize(_)
            | Universal::Nationality(_)
            | Universal::MinForeignPct(_)
            | Universal::CityStatus(_)
            | Universal::Specialist(_)
            | Universal::OutputType(_)
            | Universal::Action(_)
            | Universal::VisionLayer(_)
            | Universal::NationalIntel(_) => city::eval(self, req, ctx),

            Universal::UnitType(_)
            | Universal::UnitTypeFlag(_)
            | Universal::UnitClass(_)
            | Universal::UnitClassFlag(_)
            | Universal::MinVeteran(_)
            | Universal::UnitState(_)
            | Universal::Activity(_)
            | Universal::MinMoveFrags(_)
            | Universal::MinHitPoints(_)
            | Universal::Age(_) => unit::eval(self, req, ctx),

            Universal::MinYear(_)
            | Universal::MinCalFrag(_)
            | Universal::TopologyFlag(_)
            | Universal::ServerSetting(_) => global::eval(self, req, ctx),
        }
    }

    pub fn is_req_active(
        &self,
        req: &Requirement,
        ctx: &ReqContext<'_>,
        problem: ProblemType,
    ) -> bool {
        if req.is_invalid() {
            return false;
        }
        let survives_ok = !req.survives || survives_is_legal(req.kind(), req.range);
        debug_assert!(
            survives_ok,
            "'survives' evaluated for {} at {} range",
            req.kind(),
            req.range
        );
        if !survives_ok {
            error!(kind = %req.kind(), range = %req.range, "'survives' at unsupported range");
            return false;
        }
        self.eval_req(req, ctx).is_satisfied(req.present, problem)
    }

    /// Conjunction over the vector in insertion order.
    pub fn are_reqs_active(
        &self,
        reqs: &RequirementVector,
        ctx: &ReqContext<'_>,
        problem: ProblemType,
    ) -> bool {
        reqs.iter().all(|req| self.is_req_active(req, ctx, problem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::range::ReqRange;
    use crate::test_support::ruleset;

    #[test]
    fn any_prefers_yes_then_maybe() {
        use TriState::*;
        assert_eq!(TriState::any([No, Maybe, Yes]), Yes);
        assert_eq!(TriState::any([No, Maybe, No]), Maybe);
        assert_eq!(TriState::any([No, No]), No);
        assert_eq!(TriState::any(std::iter::empty()), No);
    }

    #[test]
    fn maybe_follows_policy_regardless_of_sign() {
        for present in [true, false] {
            assert!(TriState::Maybe.is_satisfied(present, ProblemType::Possible));
            assert!(!TriState::Maybe.is_satisfied(present, ProblemType::Certain));
        }
        assert!(TriState::Yes.is_satisfied(true, ProblemType::Certain));
        assert!(!TriState::Yes.is_satisfied(false, ProblemType::Possible));
        assert!(TriState::No.is_satisfied(false, ProblemType::Certain));
    }

    #[test]
    fn invalid_never_matches() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let ctx = ReqContext::new();
        for present in [true, false] {
            let req = Requirement::new(Universal::Invalid, ReqRange::Local, present);
            assert!(!engine.is_req_active(&req, &ctx, ProblemType::Possible));
            assert!(!engine.is_req_active(&req, &ctx, ProblemType::Certain));
        }
    }

    #[test]
    fn none_always_holds() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let req = Requirement::new(Universal::None, ReqRange::World, true);
        assert!(engine.is_req_active(&req, &ReqContext::new(), ProblemType::Certain));
    }

    #[test]
    fn illegal_range_evaluates_to_maybe() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let req = Requirement::new(Universal::MinYear(0), ReqRange::City, true);
        assert_eq!(engine.eval_req(&req, &ReqContext::new()), TriState::Maybe);
        assert!(!engine.is_req_active(&req, &ReqContext::new(), ProblemType::Certain));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "'survives' evaluated")]
    fn survives_at_unsupported_range_asserts() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let req = Requirement::new(Universal::MinSize(2), ReqRange::City, true).with_survives(true);
        engine.is_req_active(&req, &ReqContext::new(), ProblemType::Possible);
    }
}
