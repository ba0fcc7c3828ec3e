// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::collections::BTreeMap;

use swarmhive_core::domain::error::ConfigurationError;
use swarmhive_core::domain::outcome::ExecutionOutcome;
use swarmhive_core::domain::swarm::ConsensusKind;

use super::{successful, ConsensusDecision, ConsensusProtocol};

/// Stochastic quality-weighted selection, modelled on scout bees.
///
/// With probability `1 - ε` the highest-quality successful outcome is chosen
/// (ties to the lowest pool id). With probability `ε` one of the remaining
/// successful outcomes is picked uniformly. Agreement is probabilistic, so
/// any successful outcome counts as consensus.
pub struct HoneybeeConsensus {
    exploration_rate: f64,
    rng: Mutex<StdRng>,
}

impl HoneybeeConsensus {
    pub fn new(exploration_rate: f64) -> Result<Self, ConfigurationError> {
        Self::from_rng(exploration_rate, StdRng::from_os_rng())
    }

    pub fn with_seed(exploration_rate: f64, seed: u64) -> Result<Self, ConfigurationError> {
        Self::from_rng(exploration_rate, StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(exploration_rate: f64, rng: StdRng) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&exploration_rate) {
            return Err(ConfigurationError::InvalidSetting(format!(
                "exploration_rate must be within [0, 1], got {exploration_rate}"
            )));
        }
        Ok(Self {
            exploration_rate,
            rng: Mutex::new(rng),
        })
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }
}

impl std::fmt::Debug for HoneybeeConsensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoneybeeConsensus")
            .field("exploration_rate", &self.exploration_rate)
            .finish_non_exhaustive()
    }
}

impl ConsensusProtocol for HoneybeeConsensus {
    fn kind(&self) -> ConsensusKind {
        ConsensusKind::Honeybee
    }

    fn resolve(&self, outcomes: &[ExecutionOutcome]) -> ConsensusDecision {
        let candidates = successful(outcomes);
        if candidates.is_empty() {
            return ConsensusDecision::no_successful_participants();
        }

        // Candidates are sorted by pool id; a strict comparison keeps the lowest on ties.
        let best = candidates
            .iter()
            .enumerate()
            .fold(0, |best, (i, c)| if c.quality > candidates[best].quality { i } else { best });

        let chosen = {
            let mut rng = self.rng.lock();
            let explore = candidates.len() > 1 && rng.random::<f64>() < self.exploration_rate;
            if explore {
                let pick = rng.random_range(0..candidates.len() - 1);
                Some(if pick >= best { pick + 1 } else { pick })
            } else {
                None
            }
        };

        let explored = chosen.is_some();
        let index = chosen.unwrap_or(best);
        let resolved = candidates[index];

        let details = BTreeMap::from([
            ("explored".to_string(), json!(explored)),
            ("exploration_rate".to_string(), json!(self.exploration_rate)),
            ("best_pool".to_string(), json!(candidates[best].pool_id)),
            ("selected_quality".to_string(), json!(resolved.quality)),
        ]);
        ConsensusDecision::agreed(resolved.clone(), details)
    }
}
