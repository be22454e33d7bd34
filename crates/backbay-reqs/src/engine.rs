use std::collections::HashSet;
use std::sync::Mutex;

use backbay_ruleset::Ruleset;
use tracing::warn;

use crate::config::EngineConfig;
use crate::diplrel::DiplRelMatrix;
use crate::eval::TriState;
use crate::fulfill::FulfillmentRegistry;
use crate::range::ReqRange;
use crate::requirement::Requirement;
use crate::universal::UniversalKind;

/// Requirement engine bound to one loaded ruleset.
///
/// Holds the tables built once at start-up (the diplomatic contradiction
/// matrix and the fulfillment registry) and is otherwise stateless, so one
/// engine can serve any number of evaluation contexts.
pub struct ReqEngine<'r> {
    rs: &'r Ruleset,
    config: EngineConfig,
    diplrel: DiplRelMatrix,
    registry: FulfillmentRegistry,
    /// Unsupported kind/range pairs already warned about.
    reported: Mutex<HashSet<(UniversalKind, ReqRange)>>,
}

impl<'r> ReqEngine<'r> {
    pub fn new(rs: &'r Ruleset, config: EngineConfig) -> Self {
        Self {
            rs,
            config,
            diplrel: DiplRelMatrix::new(),
            registry: FulfillmentRegistry::standard(),
            reported: Mutex::new(HashSet::new()),
        }
    }

    /// Replace the fulfillment registry, e.g. to register reasoners for
    /// additional candidate kinds.
    pub fn with_registry(mut self, registry: FulfillmentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn ruleset(&self) -> &'r Ruleset {
        self.rs
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn diplrel_matrix(&self) -> &DiplRelMatrix {
        &self.diplrel
    }

    pub fn registry(&self) -> &FulfillmentRegistry {
        &self.registry
    }

    /// A kind/range pair with no evaluator path. Logged once per pair and
    /// answered with `Maybe` so the caller's policy decides.
    pub(crate) fn unsupported(&self, req: &Requirement) -> TriState {
        if self.config.log_unsupported {
            let key = (req.kind(), req.range);
            let first = match self.reported.lock() {
                Ok(mut reported) => reported.insert(key),
                Err(poisoned) => poisoned.into_inner().insert(key),
            };
            if first {
                warn!(kind = %req.kind(), range = %req.range, "unsupported requirement range");
            }
        }
        TriState::Maybe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ruleset;
    use crate::universal::Universal;

    #[test]
    fn unsupported_is_maybe_and_remembered() {
        let rs = ruleset();
        let engine = ReqEngine::new(&rs, EngineConfig::default());
        let req = Requirement::new(Universal::MinYear(0), ReqRange::City, true);
        assert_eq!(engine.unsupported(&req), TriState::Maybe);
        assert_eq!(engine.unsupported(&req), TriState::Maybe);
        let reported = engine.reported.lock().unwrap();
        assert_eq!(reported.len(), 1);
        assert!(reported.contains(&(UniversalKind::MinYear, ReqRange::City)));
    }

    #[test]
    fn silent_engine_keeps_no_record() {
        let rs = ruleset();
        let config = EngineConfig {
            log_unsupported: false,
            ..EngineConfig::default()
        };
        let engine = ReqEngine::new(&rs, config);
        let req = Requirement::new(Universal::MinYear(0), ReqRange::City, true);
        assert_eq!(engine.unsupported(&req), TriState::Maybe);
        assert!(engine.reported.lock().unwrap().is_empty());
    }
}
