//! Action enablers and their repair against hard requirements.
//!
//! A hard requirement is intrinsic to an action: every enabler for the
//! action must imply it, whatever the ruleset says. Enablers that do not are
//! extended with the missing requirement, split into one enabler per way of
//! satisfying it, or disabled when no pure extension exists.

use std::collections::{BTreeMap, VecDeque};

use backbay_ruleset::{ActionId, Ruleset};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::contradiction::is_req_in_vector;
use crate::engine::ReqEngine;
use crate::fulfill::Fulfillment;
use crate::range::ReqRange;
use crate::requirement::{RawRequirement, Requirement};
use crate::universal::{DiplRel, Universal, UniversalKind};
use crate::vector::RequirementVector;

// ============================================================================
// ENABLERS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReqSide {
    Actor,
    Target,
}

/// Named pair of requirement vectors that makes an action legal when both
/// hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionEnabler {
    pub name: String,
    pub action: ActionId,
    pub actor_reqs: RequirementVector,
    pub target_reqs: RequirementVector,
    pub disabled: bool,
}

impl ActionEnabler {
    pub fn new(name: impl Into<String>, action: ActionId) -> Self {
        Self {
            name: name.into(),
            action,
            actor_reqs: RequirementVector::new(),
            target_reqs: RequirementVector::new(),
            disabled: false,
        }
    }

    pub fn reqs(&self, side: ReqSide) -> &RequirementVector {
        match side {
            ReqSide::Actor => &self.actor_reqs,
            ReqSide::Target => &self.target_reqs,
        }
    }

    pub fn reqs_mut(&mut self, side: ReqSide) -> &mut RequirementVector {
        match side {
            ReqSide::Actor => &mut self.actor_reqs,
            ReqSide::Target => &mut self.target_reqs,
        }
    }
}

/// Every enabler of a ruleset, grouped by action in load order.
#[derive(Clone, Debug, Default)]
pub struct EnablerCollection {
    by_action: BTreeMap<ActionId, Vec<ActionEnabler>>,
}

impl EnablerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, enabler: ActionEnabler) {
        self.by_action.entry(enabler.action).or_default().push(enabler);
    }

    pub fn for_action(&self, action: ActionId) -> &[ActionEnabler] {
        self.by_action.get(&action).map_or(&[], Vec::as_slice)
    }

    pub fn actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.by_action.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionEnabler> {
        self.by_action.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_action.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace(&mut self, action: ActionId, enablers: Vec<ActionEnabler>) {
        self.by_action.insert(action, enablers);
    }
}

// ============================================================================
// HARD REQUIREMENTS
// ============================================================================

/// One obligation on an enabler side, met by implying any alternative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardRequirement {
    pub side: ReqSide,
    pub alternatives: Vec<Requirement>,
    pub reason: String,
}

impl HardRequirement {
    pub fn new(side: ReqSide, alternatives: Vec<Requirement>, reason: impl Into<String>) -> Self {
        Self {
            side,
            alternatives,
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HardRequirementTable {
    by_action: BTreeMap<ActionId, Vec<HardRequirement>>,
}

impl HardRequirementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: ActionId, hard: HardRequirement) {
        self.by_action.entry(action).or_default().push(hard);
    }

    pub fn for_action(&self, action: ActionId) -> &[HardRequirement] {
        self.by_action.get(&action).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.by_action.is_empty()
    }

    /// Obligations the game logic relies on for the built-in actions.
    /// Actions or flags the ruleset does not define are skipped.
    pub fn standard(rs: &Ruleset) -> Self {
        let mut table = Self::new();
        let local = |kind, name: &str, present| {
            let source = Universal::from_rule_name(kind, name, rs);
            (!source.is_invalid()).then(|| Requirement::new(source, ReqRange::Local, present))
        };
        let diplrel = |rel, present| {
            Some(Requirement::new(Universal::DiplRel(rel), ReqRange::Local, present))
        };
        let mut add = |action: &str, side, alternatives: Vec<Option<Requirement>>, reason| {
            let Some(action_id) = rs.actions.id_by_name(action) else {
                debug!(action, "no such action, hard requirement skipped");
                return;
            };
            let Some(alternatives) = alternatives.into_iter().collect::<Option<Vec<_>>>() else {
                debug!(action, reason, "hard requirement names unknown values, skipped");
                return;
            };
            table.add(action_id, HardRequirement::new(side, alternatives, reason));
        };

        use UniversalKind as K;
        add(
            "Conquer City",
            ReqSide::Actor,
            vec![local(K::UnitClassFlag, "CanOccupyCity", true)],
            "only units of a class that can occupy cities may conquer them",
        );
        add(
            "Conquer City",
            ReqSide::Actor,
            vec![local(K::UnitTypeFlag, "NonMil", false)],
            "non-military units cannot conquer cities",
        );
        add(
            "Conquer City",
            ReqSide::Actor,
            vec![Some(Requirement::new(
                Universal::MinMoveFrags(1),
                ReqRange::Local,
                true,
            ))],
            "moving into the city needs moves left",
        );
        add(
            "Conquer City",
            ReqSide::Actor,
            vec![
                local(K::UnitState, "OnLivableTile", true),
                local(K::UnitState, "Transported", true),
            ],
            "the attack starts from a livable tile or from a transport",
        );
        add(
            "Capture Units",
            ReqSide::Actor,
            vec![local(K::UnitTypeFlag, "Capturer", true)],
            "only capturer units may capture",
        );
        add(
            "Capture Units",
            ReqSide::Target,
            vec![local(K::UnitTypeFlag, "Capturable", true)],
            "only capturable units may be captured",
        );
        add(
            "Establish Embassy",
            ReqSide::Actor,
            vec![diplrel(DiplRel::Foreign, true)],
            "an embassy is established with another player",
        );
        add(
            "Establish Embassy",
            ReqSide::Actor,
            vec![diplrel(DiplRel::HasEmbassy, false)],
            "an embassy can only be established once",
        );
        add(
            "Bombard",
            ReqSide::Actor,
            vec![local(K::UnitTypeFlag, "NonMil", false)],
            "non-military units cannot bombard",
        );
        table
    }
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepairSuggestion {
    /// Add the requirement to the side's vector.
    Append { side: ReqSide, req: Requirement },
    /// Drop members that conflict with the requirement, then add it. Changes
    /// what the author wrote, so it is never applied automatically.
    RemoveAndAppend {
        side: ReqSide,
        remove: Vec<usize>,
        req: Requirement,
    },
}

impl RepairSuggestion {
    pub fn is_append(&self) -> bool {
        matches!(self, RepairSuggestion::Append { .. })
    }

    pub fn req(&self) -> &Requirement {
        match self {
            RepairSuggestion::Append { req, .. } | RepairSuggestion::RemoveAndAppend { req, .. } => {
                req
            }
        }
    }

    pub fn apply(&self, enabler: &mut ActionEnabler) {
        match self {
            RepairSuggestion::Append { side, req } => enabler.reqs_mut(*side).push(*req),
            RepairSuggestion::RemoveAndAppend { side, remove, req } => {
                let reqs = enabler.reqs_mut(*side);
                let mut indices = remove.clone();
                indices.sort_unstable();
                for index in indices.into_iter().rev() {
                    reqs.remove(index);
                }
                reqs.push(*req);
            }
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepairedEnabler {
    pub name: String,
    pub side: ReqSide,
    pub added: RawRequirement,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClonedEnabler {
    pub name: String,
    pub from: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisabledEnabler {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActionRepair {
    pub action: String,
    pub repaired: Vec<RepairedEnabler>,
    pub cloned: Vec<ClonedEnabler>,
    pub disabled: Vec<DisabledEnabler>,
}

impl ActionRepair {
    fn is_empty(&self) -> bool {
        self.repaired.is_empty() && self.cloned.is_empty() && self.disabled.is_empty()
    }
}

/// What one repair pass changed, per action. Actions left untouched are not
/// listed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub actions: Vec<ActionRepair>,
}

impl RepairReport {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn repaired_count(&self) -> usize {
        self.actions.iter().map(|a| a.repaired.len()).sum()
    }

    pub fn cloned_count(&self) -> usize {
        self.actions.iter().map(|a| a.cloned.len()).sum()
    }

    pub fn disabled_count(&self) -> usize {
        self.actions.iter().map(|a| a.disabled.len()).sum()
    }
}

// ============================================================================
// REPAIR
// ============================================================================

impl<'r> ReqEngine<'r> {
    /// Does the vector guarantee `alt` whenever it is active?
    pub fn vector_implies(&self, reqs: &RequirementVector, alt: &Requirement) -> bool {
        if is_req_in_vector(alt, reqs) {
            return true;
        }
        let negated = alt.negated();
        reqs.iter().any(|member| {
            self.contradicts(member, &negated)
                || (member.present
                    && member.range == alt.range
                    && self.fulfills(&member.source, alt) == Fulfillment::Yes)
        })
    }

    /// First hard requirement the enabler does not imply.
    pub fn missing_hard_requirement<'t>(
        &self,
        enabler: &ActionEnabler,
        hard: &'t [HardRequirement],
    ) -> Option<&'t HardRequirement> {
        hard.iter().find(|h| {
            let reqs = enabler.reqs(h.side);
            !h.alternatives.iter().any(|alt| self.vector_implies(reqs, alt))
        })
    }

    /// One suggestion per alternative of the hard requirement.
    pub fn suggest_repairs(
        &self,
        enabler: &ActionEnabler,
        hard: &HardRequirement,
    ) -> Vec<RepairSuggestion> {
        let reqs = enabler.reqs(hard.side);
        hard.alternatives
            .iter()
            .map(|alt| {
                let remove: Vec<usize> = reqs
                    .iter()
                    .enumerate()
                    .filter(|(_, member)| self.contradicts(member, alt))
                    .map(|(index, _)| index)
                    .collect();
                if remove.is_empty() {
                    RepairSuggestion::Append {
                        side: hard.side,
                        req: *alt,
                    }
                } else {
                    RepairSuggestion::RemoveAndAppend {
                        side: hard.side,
                        remove,
                        req: *alt,
                    }
                }
            })
            .collect()
    }

    /// First sanity problem of `after` that `before` did not already have.
    /// Appends keep existing indices, so old problems compare equal.
    fn introduced_problem(
        &self,
        before: &ActionEnabler,
        after: &ActionEnabler,
    ) -> Option<String> {
        let max_tiles = self.config().max_tiles;
        for side in [ReqSide::Actor, ReqSide::Target] {
            let Err(problems) = self.validate_vector(after.reqs(side), true, max_tiles) else {
                continue;
            };
            let known = self
                .validate_vector(before.reqs(side), true, max_tiles)
                .err()
                .unwrap_or_default();
            if let Some(problem) = problems.iter().find(|p| !known.contains(p)) {
                return Some(problem.to_string());
            }
        }
        None
    }

    /// Bring every enabler into compliance with the hard requirements of its
    /// action. Each action's enablers are repaired on a copy and swapped in
    /// once the action is done.
    pub fn repair_enablers(
        &self,
        collection: &mut EnablerCollection,
        table: &HardRequirementTable,
    ) -> RepairReport {
        let mut report = RepairReport::default();
        let actions: Vec<ActionId> = collection.actions().collect();
        for action in actions {
            let hard = table.for_action(action);
            if hard.is_empty() {
                continue;
            }
            let action_name = self
                .ruleset()
                .actions
                .rule_name(action)
                .unwrap_or("(unknown)")
                .to_string();
            let mut summary = ActionRepair {
                action: action_name,
                ..ActionRepair::default()
            };
            let repaired = self.repair_action(collection.for_action(action), hard, &mut summary);
            collection.replace(action, repaired);
            if !summary.is_empty() {
                report.actions.push(summary);
            }
        }
        report
    }

    fn repair_action(
        &self,
        enablers: &[ActionEnabler],
        hard: &[HardRequirement],
        summary: &mut ActionRepair,
    ) -> Vec<ActionEnabler> {
        let mut work: VecDeque<ActionEnabler> = enablers.iter().cloned().collect();
        let mut done = Vec::with_capacity(enablers.len());

        while let Some(mut enabler) = work.pop_front() {
            if enabler.disabled {
                done.push(enabler);
                continue;
            }
            let Some(missing) = self.missing_hard_requirement(&enabler, hard) else {
                done.push(enabler);
                continue;
            };

            let suggestions = self.suggest_repairs(&enabler, missing);
            let Some((last, rest)) = suggestions.split_last() else {
                self.disable(&mut enabler, &missing.reason, summary);
                done.push(enabler);
                continue;
            };
            if suggestions.iter().any(|s| !s.is_append()) {
                let reason = format!(
                    "{} (repair would change existing requirements)",
                    missing.reason
                );
                self.disable(&mut enabler, &reason, summary);
                done.push(enabler);
                continue;
            }

            let original = enabler.clone();
            let mut results = Vec::with_capacity(suggestions.len());
            for (n, suggestion) in rest.iter().enumerate() {
                let mut clone = enabler.clone();
                clone.name = format!("{} #{}", enabler.name, n + 1);
                suggestion.apply(&mut clone);
                info!(from = %enabler.name, clone = %clone.name, "cloned action enabler");
                summary.cloned.push(ClonedEnabler {
                    name: clone.name.clone(),
                    from: enabler.name.clone(),
                    reason: missing.reason.clone(),
                });
                self.record_repair(&clone, suggestion, missing, summary);
                results.push(clone);
            }
            last.apply(&mut enabler);
            self.record_repair(&enabler, last, missing, summary);
            results.insert(0, enabler);

            for mut result in results.into_iter().rev() {
                if let Some(problem) = self.introduced_problem(&original, &result) {
                    self.disable(&mut result, &problem, summary);
                }
                work.push_front(result);
            }
        }
        done
    }

    fn record_repair(
        &self,
        enabler: &ActionEnabler,
        suggestion: &RepairSuggestion,
        hard: &HardRequirement,
        summary: &mut ActionRepair,
    ) {
        let added = suggestion.req().to_text_parts(self.ruleset());
        info!(
            enabler = %enabler.name,
            kind = %added.kind,
            value = %added.name,
            "added hard requirement to action enabler"
        );
        summary.repaired.push(RepairedEnabler {
            name: enabler.name.clone(),
            side: hard.side,
            added,
            reason: hard.reason.clone(),
        });
    }

    fn disable(&self, enabler: &mut ActionEnabler, reason: &str, summary: &mut ActionRepair) {
        warn!(enabler = %enabler.name, reason, "disabled action enabler");
        enabler.disabled = true;
        summary.disabled.push(DisabledEnabler {
            name: enabler.name.clone(),
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_support::ruleset;

    fn named(rs: &Ruleset, kind: UniversalKind, name: &str, present: bool) -> Requirement {
        Requirement::new(Universal::from_rule_name(kind, name, rs), ReqRange::Local, present)
    }

    fn capture_enabler(rs: &Ruleset) -> ActionEnabler {
        let capture = rs.actions.id_by_name("Capture Units").unwrap();
        ActionEnabler::new("Capture", capture)
    }

    #[test]
    fn implication_through_fulfillment_and_contradiction() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let legion = named(&rs, UniversalKind::UnitType, "Legion", true);
        let capturer = named(&rs, UniversalKind::UnitTypeFlag, "Capturer", true);
        let reqs = RequirementVector::from(vec![legion]);
        assert!(engine.vector_implies(&reqs, &capturer));

        let moves = Requirement::new(Universal::MinMoveFrags(1), ReqRange::Local, true);
        let three = Requirement::new(Universal::MinMoveFrags(3), ReqRange::Local, true);
        assert!(engine.vector_implies(&RequirementVector::from(vec![three]), &moves));
        assert!(!engine.vector_implies(&reqs, &moves));
    }

    #[test]
    fn missing_requirement_is_appended() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let table = HardRequirementTable::standard(&rs);
        let mut collection = EnablerCollection::new();
        collection.add(capture_enabler(&rs));

        let report = engine.repair_enablers(&mut collection, &table);
        assert_eq!(report.repaired_count(), 2);
        assert_eq!(report.cloned_count(), 0);
        assert_eq!(report.disabled_count(), 0);

        let enabler = collection.iter().next().unwrap();
        assert!(!enabler.disabled);
        assert!(enabler
            .actor_reqs
            .contains(&named(&rs, UniversalKind::UnitTypeFlag, "Capturer", true)));
        assert!(enabler
            .target_reqs
            .contains(&named(&rs, UniversalKind::UnitTypeFlag, "Capturable", true)));
    }

    #[test]
    fn conflicting_enabler_is_disabled() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let table = HardRequirementTable::standard(&rs);
        let mut enabler = capture_enabler(&rs);
        enabler
            .actor_reqs
            .push(named(&rs, UniversalKind::UnitTypeFlag, "Capturer", false));
        let mut collection = EnablerCollection::new();
        collection.add(enabler);

        let report = engine.repair_enablers(&mut collection, &table);
        assert_eq!(report.disabled_count(), 1);
        assert!(collection.iter().all(|e| e.disabled));
        // the author's requirement is left alone
        assert_eq!(collection.iter().next().unwrap().actor_reqs.len(), 1);
    }

    #[test]
    fn existing_problems_do_not_disable_a_repair() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let table = HardRequirementTable::standard(&rs);
        let mut enabler = capture_enabler(&rs);
        for gov in ["Monarchy", "Republic"] {
            enabler.actor_reqs.push(Requirement::new(
                Universal::from_rule_name(UniversalKind::Government, gov, &rs),
                ReqRange::Player,
                true,
            ));
        }
        assert!(engine.validate_vector(&enabler.actor_reqs, true, -1).is_err());
        let mut collection = EnablerCollection::new();
        collection.add(enabler);

        let report = engine.repair_enablers(&mut collection, &table);
        assert_eq!(report.repaired_count(), 2);
        assert_eq!(report.disabled_count(), 0);
        let repaired = collection.iter().next().unwrap();
        assert!(!repaired.disabled);
        assert_eq!(repaired.actor_reqs.len(), 3);
    }

    #[test]
    fn alternatives_fan_out_into_clones() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let conquer = rs.actions.id_by_name("Conquer City").unwrap();
        let mut table = HardRequirementTable::new();
        let livable = named(&rs, UniversalKind::UnitState, "OnLivableTile", true);
        let transported = named(&rs, UniversalKind::UnitState, "Transported", true);
        table.add(
            conquer,
            HardRequirement::new(ReqSide::Actor, vec![livable, transported], "reachable"),
        );
        let mut collection = EnablerCollection::new();
        collection.add(ActionEnabler::new("Conquer", conquer));

        let report = engine.repair_enablers(&mut collection, &table);
        assert_eq!(report.cloned_count(), 1);
        assert_eq!(report.repaired_count(), 2);

        let enablers = collection.for_action(conquer);
        assert_eq!(enablers.len(), 2);
        assert_eq!(enablers[0].name, "Conquer");
        assert!(enablers[0].actor_reqs.contains(&transported));
        assert_eq!(enablers[1].name, "Conquer #1");
        assert!(enablers[1].actor_reqs.contains(&livable));
    }

    #[test]
    fn repair_is_idempotent() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let table = HardRequirementTable::standard(&rs);
        let conquer = rs.actions.id_by_name("Conquer City").unwrap();
        let mut collection = EnablerCollection::new();
        collection.add(ActionEnabler::new("Conquer", conquer));
        collection.add(capture_enabler(&rs));

        let first = engine.repair_enablers(&mut collection, &table);
        assert!(!first.is_empty());
        let snapshot: Vec<ActionEnabler> = collection.iter().cloned().collect();

        let second = engine.repair_enablers(&mut collection, &table);
        assert!(second.is_empty());
        assert_eq!(collection.iter().cloned().collect::<Vec<_>>(), snapshot);
    }

    #[test]
    fn actions_without_hard_requirements_are_untouched() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let found = rs.actions.id_by_name("Found City").unwrap();
        let mut collection = EnablerCollection::new();
        collection.add(ActionEnabler::new("Found", found));
        let table = HardRequirementTable::standard(&rs);
        let report = engine.repair_enablers(&mut collection, &table);
        assert!(report.is_empty());
        assert_eq!(collection.len(), 1);
    }
}
