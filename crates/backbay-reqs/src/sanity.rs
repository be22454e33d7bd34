//! Structural validation of whole requirement vectors.

use std::collections::BTreeMap;

use backbay_ruleset::TerrainClass;
use serde::Serialize;
use tracing::warn;

use crate::config::SanityPolicy;
use crate::engine::ReqEngine;
use crate::range::ReqRange;
use crate::requirement::{range_is_legal, survives_is_legal};
use crate::universal::UniversalKind;
use crate::vector::RequirementVector;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum SanityProblem {
    #[error("requirement {index}: {kind} is not supported at {range} range")]
    BadRange {
        index: usize,
        kind: UniversalKind,
        range: ReqRange,
    },
    #[error("requirement {index}: 'survives' is not supported for {kind} at {range} range")]
    BadSurvives {
        index: usize,
        kind: UniversalKind,
        range: ReqRange,
    },
    #[error("requirement {index} could not be resolved")]
    InvalidUniversal { index: usize },
    #[error("{count} positive {kind} requirements where at most one is possible")]
    TooMany { kind: UniversalKind, count: usize },
    #[error("both Local Terrain and Local TerrainClass requirements")]
    TerrainAndClass,
    #[error("{count} positive {kind} requirements but only {max} tiles can satisfy them")]
    TooManyTiles {
        kind: UniversalKind,
        count: usize,
        max: usize,
    },
    #[error("requirements {first} and {second} contradict each other")]
    Contradiction { first: usize, second: usize },
}

/// Kinds with at most one positive requirement per vector, at any range.
fn single_positive(kind: UniversalKind) -> bool {
    use UniversalKind as K;
    matches!(
        kind,
        K::Government
            | K::Action
            | K::Activity
            | K::OutputType
            | K::Specialist
            | K::MinSize
            | K::AiLevel
            | K::MinYear
            | K::MinCalFrag
            | K::MinMoveFrags
            | K::MinHitPoints
            | K::MinVeteran
            | K::MaxUnitsOnTile
            | K::Age
            | K::MinTechs
            | K::MinCulture
            | K::MinForeignPct
            | K::VisionLayer
            | K::NationalIntel
    )
}

/// Kinds with at most one positive requirement at Local range: a single
/// unit has one type and class, a single tile one terrain.
fn single_positive_local(kind: UniversalKind) -> bool {
    use UniversalKind as K;
    matches!(kind, K::UnitType | K::UnitClass | K::Terrain | K::TerrainClass)
}

/// Outcome of checking one rule under the configured policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleStatus {
    Enabled,
    Disabled(Vec<SanityProblem>),
}

#[derive(Debug, thiserror::Error)]
#[error("{owner}: {}", .problems.first().map(ToString::to_string).unwrap_or_default())]
pub struct RulesetRejected {
    pub owner: String,
    pub problems: Vec<SanityProblem>,
}

impl<'r> ReqEngine<'r> {
    /// Validate a vector, collecting every problem found.
    ///
    /// Legality of each member is always checked. Cardinality, terrain and
    /// contradiction rules only make sense for conjunctive vectors.
    /// `max_tiles` bounds how many distinct tiles the owner's scope covers;
    /// -1 disables that check.
    pub fn validate_vector(
        &self,
        reqs: &RequirementVector,
        conjunctive: bool,
        max_tiles: i32,
    ) -> Result<(), Vec<SanityProblem>> {
        let mut problems = Vec::new();

        for (index, req) in reqs.iter().enumerate() {
            if req.is_invalid() {
                problems.push(SanityProblem::InvalidUniversal { index });
                continue;
            }
            let kind = req.kind();
            if !range_is_legal(kind, req.range) {
                problems.push(SanityProblem::BadRange {
                    index,
                    kind,
                    range: req.range,
                });
            }
            if req.survives && !survives_is_legal(kind, req.range) {
                problems.push(SanityProblem::BadSurvives {
                    index,
                    kind,
                    range: req.range,
                });
            }
        }

        if conjunctive {
            self.check_cardinality(reqs, max_tiles, &mut problems);
            let slice = reqs.as_slice();
            for (first, r1) in slice.iter().enumerate() {
                for (second, r2) in slice.iter().enumerate().skip(first + 1) {
                    if self.contradicts(r1, r2) {
                        problems.push(SanityProblem::Contradiction { first, second });
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    fn check_cardinality(
        &self,
        reqs: &RequirementVector,
        max_tiles: i32,
        problems: &mut Vec<SanityProblem>,
    ) {
        let mut positive: BTreeMap<UniversalKind, usize> = BTreeMap::new();
        let mut positive_local: BTreeMap<UniversalKind, usize> = BTreeMap::new();
        for req in reqs.iter().filter(|r| r.present && !r.is_invalid()) {
            *positive.entry(req.kind()).or_default() += 1;
            if req.range == ReqRange::Local {
                *positive_local.entry(req.kind()).or_default() += 1;
            }
        }

        for (kind, count) in &positive {
            if single_positive(*kind) && *count > 1 {
                problems.push(SanityProblem::TooMany {
                    kind: *kind,
                    count: *count,
                });
            }
        }
        for (kind, count) in &positive_local {
            if single_positive_local(*kind) && *count > 1 {
                problems.push(SanityProblem::TooMany {
                    kind: *kind,
                    count: *count,
                });
            }
        }

        let local = |kind| positive_local.get(&kind).copied().unwrap_or_default();
        if local(UniversalKind::Terrain) > 0 && local(UniversalKind::TerrainClass) > 0 {
            problems.push(SanityProblem::TerrainAndClass);
        }

        let tiles = usize::try_from(max_tiles).ok();
        let all = |kind| positive.get(&kind).copied().unwrap_or_default();
        let terrains = all(UniversalKind::Terrain);
        if let Some(max) = tiles.filter(|max| terrains > *max) {
            problems.push(SanityProblem::TooManyTiles {
                kind: UniversalKind::Terrain,
                count: terrains,
                max,
            });
        }
        let classes = all(UniversalKind::TerrainClass);
        if let Some(max) = tiles {
            let limit = max.min(TerrainClass::ALL.len());
            if classes > limit {
                problems.push(SanityProblem::TooManyTiles {
                    kind: UniversalKind::TerrainClass,
                    count: classes,
                    max: limit,
                });
            }
        }
    }

    /// Validate one rule's vector and apply the configured policy. Problems
    /// are logged against the owner either way.
    pub fn check_rule(
        &self,
        owner: &str,
        reqs: &RequirementVector,
        conjunctive: bool,
    ) -> Result<RuleStatus, RulesetRejected> {
        let Err(problems) = self.validate_vector(reqs, conjunctive, self.config().max_tiles) else {
            return Ok(RuleStatus::Enabled);
        };
        for problem in &problems {
            warn!(owner, %problem, "requirement vector failed sanity check");
        }
        match self.config().sanity_policy {
            SanityPolicy::DisableRule => Ok(RuleStatus::Disabled(problems)),
            SanityPolicy::RejectRuleset => Err(RulesetRejected {
                owner: owner.to_string(),
                problems,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::requirement::Requirement;
    use crate::test_support::ruleset;
    use crate::universal::Universal;

    fn named(rs: &backbay_ruleset::Ruleset, kind: UniversalKind, name: &str) -> Universal {
        Universal::from_rule_name(kind, name, rs)
    }

    #[test]
    fn two_governments_rejected() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let vec = RequirementVector::from(vec![
            Requirement::new(
                named(&rs, UniversalKind::Government, "Monarchy"),
                ReqRange::Player,
                true,
            ),
            Requirement::new(
                named(&rs, UniversalKind::Government, "Republic"),
                ReqRange::Player,
                true,
            ),
        ]);
        let problems = engine.validate_vector(&vec, true, -1).unwrap_err();
        assert_eq!(
            problems,
            vec![SanityProblem::TooMany {
                kind: UniversalKind::Government,
                count: 2
            }]
        );
        // the same list read as alternatives is fine
        assert!(engine.validate_vector(&vec, false, -1).is_ok());
    }

    #[test]
    fn unit_flags_compose() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let vec = RequirementVector::from(vec![
            Requirement::new(
                named(&rs, UniversalKind::UnitTypeFlag, "Diplomat"),
                ReqRange::Local,
                true,
            ),
            Requirement::new(
                named(&rs, UniversalKind::UnitTypeFlag, "NonMil"),
                ReqRange::Local,
                true,
            ),
        ]);
        assert!(engine.validate_vector(&vec, true, -1).is_ok());
    }

    #[test]
    fn negative_requirements_do_not_count() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let vec = RequirementVector::from(vec![
            Requirement::new(
                named(&rs, UniversalKind::Government, "Anarchy"),
                ReqRange::Player,
                false,
            ),
            Requirement::new(
                named(&rs, UniversalKind::Government, "Despotism"),
                ReqRange::Player,
                false,
            ),
        ]);
        assert!(engine.validate_vector(&vec, true, -1).is_ok());
    }

    #[test]
    fn local_unit_type_is_single_but_wider_is_not() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let a = named(&rs, UniversalKind::Terrain, "Hills");
        let b = named(&rs, UniversalKind::Terrain, "Forest");
        let local = RequirementVector::from(vec![
            Requirement::new(a, ReqRange::Local, true),
            Requirement::new(b, ReqRange::Local, true),
        ]);
        assert!(engine.validate_vector(&local, true, -1).is_err());

        let adjacent = RequirementVector::from(vec![
            Requirement::new(a, ReqRange::Adjacent, true),
            Requirement::new(b, ReqRange::Adjacent, true),
        ]);
        assert!(engine.validate_vector(&adjacent, true, -1).is_ok());
        let problems = engine.validate_vector(&adjacent, true, 1).unwrap_err();
        assert!(matches!(
            problems[0],
            SanityProblem::TooManyTiles { count: 2, max: 1, .. }
        ));
    }

    #[test]
    fn local_terrain_with_class_rejected() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let vec = RequirementVector::from(vec![
            Requirement::new(named(&rs, UniversalKind::Terrain, "Hills"), ReqRange::Local, true),
            Requirement::new(
                named(&rs, UniversalKind::TerrainClass, "Land"),
                ReqRange::Local,
                true,
            ),
        ]);
        let problems = engine.validate_vector(&vec, true, -1).unwrap_err();
        assert!(problems.contains(&SanityProblem::TerrainAndClass));
    }

    #[test]
    fn terrain_classes_are_unbounded_without_tile_limit() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let land = named(&rs, UniversalKind::TerrainClass, "Land");
        let oceanic = named(&rs, UniversalKind::TerrainClass, "Oceanic");
        let vec = RequirementVector::from(vec![
            Requirement::new(land, ReqRange::Local, true),
            Requirement::new(oceanic, ReqRange::Adjacent, true),
            Requirement::new(land, ReqRange::City, true),
        ]);
        assert_eq!(engine.validate_vector(&vec, true, -1), Ok(()));

        let problems = engine.validate_vector(&vec, true, 8).unwrap_err();
        assert_eq!(
            problems,
            [SanityProblem::TooManyTiles {
                kind: UniversalKind::TerrainClass,
                count: 3,
                max: 2,
            }]
        );
    }

    #[test]
    fn legality_and_contradictions_are_all_reported() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let three = Requirement::new(Universal::MinMoveFrags(3), ReqRange::Local, true);
        let vec = RequirementVector::from(vec![
            three,
            Requirement::new(Universal::MinYear(0), ReqRange::City, true),
            Requirement::invalid(),
            three.negated(),
        ]);
        let problems = engine.validate_vector(&vec, true, -1).unwrap_err();
        assert!(problems.contains(&SanityProblem::BadRange {
            index: 1,
            kind: UniversalKind::MinYear,
            range: ReqRange::City,
        }));
        assert!(problems.contains(&SanityProblem::InvalidUniversal { index: 2 }));
        assert!(problems.contains(&SanityProblem::Contradiction {
            first: 0,
            second: 3
        }));
    }

    #[test]
    fn policy_decides_between_disable_and_reject() {
        let rs = ruleset();
        let bad = RequirementVector::from(vec![Requirement::invalid()]);

        let lenient = ReqEngine::new(&rs, EngineConfig::default());
        assert!(matches!(
            lenient.check_rule("Effect #3", &bad, true),
            Ok(RuleStatus::Disabled(_))
        ));
        assert_eq!(
            lenient.check_rule("Effect #4", &RequirementVector::new(), true).unwrap(),
            RuleStatus::Enabled
        );

        let strict = ReqEngine::new(
            &rs,
            EngineConfig {
                sanity_policy: SanityPolicy::RejectRuleset,
                ..EngineConfig::default()
            },
        );
        let err = strict.check_rule("Effect #3", &bad, true).unwrap_err();
        assert_eq!(err.owner, "Effect #3");
        assert_eq!(err.to_string(), "Effect #3: requirement 0 could not be resolved");
    }
}
