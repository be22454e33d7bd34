use std::collections::BTreeMap;

use backbay_ruleset::Ruleset;

use crate::requirement::{RawRequirement, ReqError, Requirement};
use crate::universal::Universal;

/// Ordered, conjunctive list of requirements owned by one rule object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RequirementVector {
    reqs: Vec<Requirement>,
    /// Source text of invalid markers, by position, so writing the vector
    /// back keeps what the author wrote.
    unresolved: BTreeMap<usize, RawRequirement>,
}

impl RequirementVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reqs.is_empty()
    }

    pub fn push(&mut self, req: Requirement) {
        self.reqs.push(req);
    }

    pub fn remove(&mut self, index: usize) -> Option<Requirement> {
        if index >= self.reqs.len() {
            return None;
        }
        self.unresolved = std::mem::take(&mut self.unresolved)
            .into_iter()
            .filter(|(at, _)| *at != index)
            .map(|(at, raw)| if at > index { (at - 1, raw) } else { (at, raw) })
            .collect();
        Some(self.reqs.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Requirement> {
        self.reqs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.reqs.iter()
    }

    pub fn as_slice(&self) -> &[Requirement] {
        &self.reqs
    }

    /// Exact membership, `quiet` included.
    pub fn contains(&self, req: &Requirement) -> bool {
        self.reqs.contains(req)
    }

    /// Any member, of either sign, that examines `source`.
    pub fn mentions(&self, source: &Universal) -> bool {
        self.reqs.iter().any(|req| req.source == *source)
    }

    pub fn has_invalid(&self) -> bool {
        self.reqs.iter().any(Requirement::is_invalid)
    }

    /// Parse every entry, stopping at the first failure.
    pub fn from_raw(rs: &Ruleset, raw: &[RawRequirement]) -> Result<Self, ReqError> {
        raw.iter()
            .map(|r| Requirement::from_raw(rs, r))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from)
    }

    /// Parse every entry; failures are logged and kept as invalid markers so
    /// the owner can be disabled rather than silently loosened.
    pub fn from_raw_lenient(rs: &Ruleset, owner: &str, raw: &[RawRequirement]) -> Self {
        let mut vector = Self::new();
        for (index, entry) in raw.iter().enumerate() {
            let req = Requirement::from_text_or_invalid(rs, owner, entry);
            if req.is_invalid() {
                vector.unresolved.insert(index, entry.clone());
            }
            vector.push(req);
        }
        vector
    }

    /// Textual form; invalid markers read from text are written as read.
    pub fn to_raw(&self, rs: &Ruleset) -> Vec<RawRequirement> {
        self.reqs
            .iter()
            .enumerate()
            .map(|(index, req)| match self.unresolved.get(&index) {
                Some(raw) => raw.clone(),
                None => req.to_text_parts(rs),
            })
            .collect()
    }
}

impl From<Vec<Requirement>> for RequirementVector {
    fn from(reqs: Vec<Requirement>) -> Self {
        Self {
            reqs,
            unresolved: BTreeMap::new(),
        }
    }
}

impl FromIterator<Requirement> for RequirementVector {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a RequirementVector {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.reqs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::ReqRange;
    use crate::test_support::ruleset;

    #[test]
    fn insertion_order_is_kept() {
        let a = Requirement::new(Universal::MinSize(3), ReqRange::City, true);
        let b = Requirement::new(Universal::MinYear(0), ReqRange::World, false);
        let mut vector = RequirementVector::new();
        vector.push(a);
        vector.push(b);
        assert_eq!(vector.as_slice(), &[a, b]);
        assert!(vector.contains(&b));
        assert!(!vector.contains(&b.negated()));
        assert!(vector.mentions(&Universal::MinYear(0)));
        assert_eq!(vector.remove(0), Some(a));
        assert_eq!(vector.remove(5), None);
    }

    #[test]
    fn lenient_parse_keeps_invalid_markers() {
        let rs = ruleset();
        let raw: Vec<RawRequirement> = serde_yaml::from_str(
            "- type: Gov\n  name: Monarchy\n- type: Tech\n  name: Telepathy\n",
        )
        .unwrap();
        assert!(RequirementVector::from_raw(&rs, &raw).is_err());

        let vector = RequirementVector::from_raw_lenient(&rs, "test", &raw);
        assert_eq!(vector.len(), 2);
        assert!(vector.has_invalid());
    }

    #[test]
    fn unresolved_text_is_written_back() {
        let rs = ruleset();
        let raw: Vec<RawRequirement> = serde_yaml::from_str(
            "- type: Tech\n  name: Wrting\n  range: Player\n- type: Gov\n  name: Monarchy\n",
        )
        .unwrap();
        let mut vector = RequirementVector::from_raw_lenient(&rs, "test", &raw);
        vector.push(Requirement::new(Universal::MinSize(3), ReqRange::City, true));

        let written = vector.to_raw(&rs);
        assert_eq!(written[0], raw[0]);
        assert_eq!(written[1].name, "Monarchy");
        assert_eq!(written[2].kind, "MinSize");

        // positions follow removals
        vector.remove(1);
        assert_eq!(vector.to_raw(&rs)[0], raw[0]);
        vector.remove(0);
        assert!(!vector.has_invalid());
        assert_eq!(vector.to_raw(&rs)[0].kind, "MinSize");
    }
}
