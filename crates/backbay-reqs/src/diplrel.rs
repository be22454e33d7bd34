//! Precomputed contradictions between diplomatic-relation requirements.

use crate::range::ReqRange;
use crate::universal::DiplRel;

/// Ranges a diplomatic relation can be required at, narrowest first.
const RANGES: [ReqRange; 5] = [
    ReqRange::Local,
    ReqRange::Player,
    ReqRange::Team,
    ReqRange::Alliance,
    ReqRange::World,
];

/// One side of a diplomatic-relation requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiplRelReq {
    pub rel: DiplRel,
    pub range: ReqRange,
    pub present: bool,
}

impl DiplRelReq {
    pub fn new(rel: DiplRel, range: ReqRange, present: bool) -> Self {
        Self {
            rel,
            range,
            present,
        }
    }

    fn index(self) -> Option<usize> {
        let range = RANGES.iter().position(|r| *r == self.range)?;
        Some((self.rel.index() * RANGES.len() + range) * 2 + usize::from(self.present))
    }
}

/// Symmetric contradiction table over every (relation, range, present)
/// triple. Built once per engine.
#[derive(Clone, Debug)]
pub struct DiplRelMatrix {
    size: usize,
    bits: Vec<bool>,
}

impl Default for DiplRelMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl DiplRelMatrix {
    pub fn new() -> Self {
        let nodes: Vec<DiplRelReq> = DiplRel::ALL
            .iter()
            .flat_map(|rel| {
                RANGES.iter().flat_map(move |range| {
                    [false, true]
                        .into_iter()
                        .map(move |present| DiplRelReq::new(*rel, *range, present))
                })
            })
            .collect();

        let size = nodes.len();
        let mut matrix = Self {
            size,
            bits: vec![false; size * size],
        };
        for a in &nodes {
            for b in &nodes {
                if rule_contradicts(*a, *b) {
                    matrix.set(*a, *b);
                    matrix.set(*b, *a);
                }
            }
        }
        matrix
    }

    fn set(&mut self, a: DiplRelReq, b: DiplRelReq) {
        if let (Some(i), Some(j)) = (a.index(), b.index()) {
            self.bits[i * self.size + j] = true;
        }
    }

    /// Known contradiction between the two requirements. Ranges a relation
    /// cannot be required at never contradict anything.
    pub fn contradicts(&self, a: DiplRelReq, b: DiplRelReq) -> bool {
        match (a.index(), b.index()) {
            (Some(i), Some(j)) => self.bits[i * self.size + j],
            _ => false,
        }
    }
}

fn rule_contradicts(a: DiplRelReq, b: DiplRelReq) -> bool {
    if a.rel == b.rel {
        if a.range == b.range {
            return a.present != b.present;
        }
        // Holding towards one player means holding at every wider range.
        let (narrow, wide) = if a.range < b.range { (a, b) } else { (b, a) };
        return narrow.present && !wide.present;
    }

    if a.range == ReqRange::Local && b.range == ReqRange::Local {
        // One diplomatic state per pair of players.
        if a.present && b.present && a.rel.is_diplstate() && b.rel.is_diplstate() {
            return true;
        }
    }

    // Any relation towards the other player makes them a foreigner.
    let foreign_absent = |req: DiplRelReq| req.rel == DiplRel::Foreign && !req.present;
    (a.range == ReqRange::Local && a.present && foreign_absent(b))
        || (b.range == ReqRange::Local && b.present && foreign_absent(a))
}
