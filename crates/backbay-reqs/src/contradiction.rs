//! Static contradiction detection between requirements.
//!
//! Sound for the pairs it knows about, not complete: `false` means "no known
//! contradiction", never "consistent".

use crate::diplrel::DiplRelReq;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::{Universal, UniversalKind};
use crate::vector::RequirementVector;

/// Kinds whose value is a lower bound: "at least N" over the range.
fn is_threshold(kind: UniversalKind) -> bool {
    use UniversalKind as K;
    matches!(
        kind,
        K::MinMoveFrags
            | K::MinHitPoints
            | K::MinVeteran
            | K::MinSize
            | K::MinCulture
            | K::MinForeignPct
            | K::MinTechs
            | K::MinYear
            | K::MinCalFrag
            | K::Age
    )
}

fn threshold_value(source: &Universal) -> Option<i32> {
    match *source {
        Universal::MinVeteran(level) => Some(i32::from(level)),
        Universal::MinMoveFrags(v)
        | Universal::MinHitPoints(v)
        | Universal::MinSize(v)
        | Universal::MinCulture(v)
        | Universal::MinForeignPct(v)
        | Universal::MinTechs(v)
        | Universal::MinYear(v)
        | Universal::MinCalFrag(v)
        | Universal::Age(v) => Some(v),
        _ => None,
    }
}

/// Is the requirement the exact negation of the other?
fn opposite(r1: &Requirement, r2: &Requirement) -> bool {
    r1.source == r2.source
        && r1.range == r2.range
        && r1.survives == r2.survives
        && r1.present != r2.present
}

/// "At least a" together with "not at least b" is impossible iff a >= b.
fn thresholds_contradict(r1: &Requirement, r2: &Requirement) -> bool {
    if r1.kind() != r2.kind()
        || !is_threshold(r1.kind())
        || r1.range != r2.range
        || r1.survives != r2.survives
        || r1.present == r2.present
    {
        return false;
    }
    let (Some(v1), Some(v2)) = (threshold_value(&r1.source), threshold_value(&r2.source)) else {
        return false;
    };
    if r1.present {
        v1 >= v2
    } else {
        v1 <= v2
    }
}

impl<'r> ReqEngine<'r> {
    /// Can both requirements never be active at once?
    pub fn contradicts(&self, r1: &Requirement, r2: &Requirement) -> bool {
        if opposite(r1, r2) {
            return true;
        }
        if thresholds_contradict(r1, r2) {
            return true;
        }
        match (r1.source, r2.source) {
            (Universal::Improvement(_), Universal::ImprGenus(_)) => self.building_vs_genus(r1, r2),
            (Universal::ImprGenus(_), Universal::Improvement(_)) => self.building_vs_genus(r2, r1),
            (Universal::Nation(_), Universal::NationGroup(_)) => self.nation_vs_group(r1, r2),
            (Universal::NationGroup(_), Universal::Nation(_)) => self.nation_vs_group(r2, r1),
            (Universal::DiplRel(a), Universal::DiplRel(b)) => self.diplrel_matrix().contradicts(
                DiplRelReq::new(a, r1.range, r1.present),
                DiplRelReq::new(b, r2.range, r2.present),
            ),
            _ => false,
        }
    }

    /// A required building has a known genus; requiring or excluding a
    /// genus on the same building can settle the pair statically.
    fn building_vs_genus(&self, building: &Requirement, genus: &Requirement) -> bool {
        let (Universal::Improvement(b), Universal::ImprGenus(g)) = (building.source, genus.source)
        else {
            return false;
        };
        if building.range != ReqRange::Local || genus.range != ReqRange::Local || !building.present
        {
            return false;
        }
        let Some(actual) = self.ruleset().building_genus(b) else {
            return false;
        };
        if genus.present {
            actual != g
        } else {
            actual == g
        }
    }

    fn nation_vs_group(&self, nation: &Requirement, group: &Requirement) -> bool {
        let (Universal::Nation(n), Universal::NationGroup(g)) = (nation.source, group.source) else {
            return false;
        };
        if nation.range != ReqRange::Player || group.range != ReqRange::Player || !nation.present {
            return false;
        }
        let member = self.ruleset().nation_in_group(n, g);
        if group.present {
            !member
        } else {
            member
        }
    }

    /// Indices of the first contradicting pair, in scan order.
    pub fn first_contradiction(&self, reqs: &RequirementVector) -> Option<(usize, usize)> {
        let slice = reqs.as_slice();
        for (i, r1) in slice.iter().enumerate() {
            for (j, r2) in slice.iter().enumerate().skip(i + 1) {
                if self.contradicts(r1, r2) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Does `req` contradict any member of the vector?
    pub fn vector_contradicts(&self, req: &Requirement, reqs: &RequirementVector) -> bool {
        reqs.iter().any(|member| self.contradicts(req, member))
    }
}

/// Membership by evaluation-relevant equality, ignoring `quiet`.
pub fn is_req_in_vector(req: &Requirement, reqs: &RequirementVector) -> bool {
    reqs.iter().any(|member| member.same_test(req))
}

#[cfg(test)]
mod tests {
    use backbay_ruleset::BuildingGenus;

    use super::*;
    use crate::config::EngineConfig;
    use crate::test_support::ruleset;
    use crate::universal::DiplRel;

    fn local(source: Universal, present: bool) -> Requirement {
        Requirement::new(source, ReqRange::Local, present)
    }

    #[test]
    fn exact_opposites() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let library = rs.buildings.id_by_name("Library").unwrap();
        let req = Requirement::new(Universal::Improvement(library), ReqRange::City, true);
        assert!(engine.contradicts(&req, &req.negated()));
        assert!(!engine.contradicts(&req, &req));

        // a different range is a different test
        let wider = Requirement::new(Universal::Improvement(library), ReqRange::Player, false);
        assert!(!engine.contradicts(&req, &wider));
    }

    #[test]
    fn min_moves_inequality() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());

        // at least 3 and fewer than 1: impossible
        let three = local(Universal::MinMoveFrags(3), true);
        let not_one = local(Universal::MinMoveFrags(1), false);
        assert!(engine.contradicts(&three, &not_one));
        assert!(engine.contradicts(&not_one, &three));

        // at least 3 and fewer than 5: moves 3 or 4 satisfy both
        let not_five = local(Universal::MinMoveFrags(5), false);
        assert!(!engine.contradicts(&three, &not_five));
        assert!(!engine.contradicts(&not_five, &three));

        // at least 3 and fewer than 3: impossible
        let not_three = local(Universal::MinMoveFrags(3), false);
        assert!(engine.contradicts(&three, &not_three));

        // two lower bounds never conflict
        let five = local(Universal::MinMoveFrags(5), true);
        assert!(!engine.contradicts(&three, &five));
    }

    #[test]
    fn building_against_genus() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let pyramids = rs.buildings.id_by_name("Pyramids").unwrap();
        let building = local(Universal::Improvement(pyramids), true);

        let wonder = local(Universal::ImprGenus(BuildingGenus::GreatWonder), true);
        let improvement = local(Universal::ImprGenus(BuildingGenus::Improvement), true);
        assert!(!engine.contradicts(&building, &wonder));
        assert!(engine.contradicts(&building, &improvement));
        assert!(engine.contradicts(&wonder.negated(), &building));
        assert!(!engine.contradicts(&building.negated(), &improvement));
    }

    #[test]
    fn nation_against_group() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let roman = rs.nations.id_by_name("Roman").unwrap();
        let ancient = rs.nation_groups.id_by_name("Ancient").unwrap();
        let medieval = rs.nation_groups.id_by_name("Medieval").unwrap();
        let nation = Requirement::new(Universal::Nation(roman), ReqRange::Player, true);
        let not_ancient =
            Requirement::new(Universal::NationGroup(ancient), ReqRange::Player, false);
        let medieval = Requirement::new(Universal::NationGroup(medieval), ReqRange::Player, true);
        assert!(engine.contradicts(&nation, &not_ancient));
        assert!(engine.contradicts(&medieval, &nation));
        assert!(!engine.contradicts(&nation, &not_ancient.negated()));
    }

    #[test]
    fn diplomatic_states_are_exclusive_locally() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let war = local(Universal::DiplRel(DiplRel::War), true);
        let peace = local(Universal::DiplRel(DiplRel::Peace), true);
        assert!(engine.contradicts(&war, &peace));
    }

    #[test]
    fn vector_helpers() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let three = local(Universal::MinMoveFrags(3), true);
        let hp = local(Universal::MinHitPoints(5), true);
        let not_two = local(Universal::MinMoveFrags(2), false);
        let vec = RequirementVector::from(vec![three, hp, not_two]);
        assert_eq!(engine.first_contradiction(&vec), Some((0, 2)));
        assert!(engine.vector_contradicts(&three.negated(), &vec));
        assert!(!engine.vector_contradicts(&local(Universal::MinHitPoints(1), true), &vec));

        assert!(is_req_in_vector(&hp.with_quiet(true), &vec));
        assert!(!is_req_in_vector(&hp.negated(), &vec));
    }
}
