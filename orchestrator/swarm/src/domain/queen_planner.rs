// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Queen planning
//!
//! Pure decision functions mapping a queen kind (and, for the adaptive queen,
//! a snapshot of its recent memory) to the worker roles of one execution.

use serde::{Deserialize, Serialize};

use swarmhive_core::domain::queen::{QueenKind, QueenMemoryRecord, QueenStrategy};
use swarmhive_core::domain::swarm_config::HiveMindSettings;
use swarmhive_core::domain::worker::WorkerRole;

pub const STRATEGIC_ROLES: [WorkerRole; 3] = [WorkerRole::Scout, WorkerRole::Builder, WorkerRole::Harvester];
pub const TACTICAL_ROLES: [WorkerRole; 3] = [WorkerRole::Forager, WorkerRole::Soldier, WorkerRole::Guard];
pub const GROWTH_PROFILE: [WorkerRole; 3] = [WorkerRole::Scout, WorkerRole::Forager, WorkerRole::Guard];
pub const RECOVERY_PROFILE: [WorkerRole; 3] = [WorkerRole::Nurse, WorkerRole::Cleaner, WorkerRole::Guard];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptiveProfile {
    Growth,
    Recovery,
}

impl AdaptiveProfile {
    pub fn roles(self) -> [WorkerRole; 3] {
        match self {
            AdaptiveProfile::Growth => GROWTH_PROFILE,
            AdaptiveProfile::Recovery => RECOVERY_PROFILE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveDecision {
    pub profile: AdaptiveProfile,
    pub observed: usize,
    /// `None` while the history is shorter than the window.
    pub mean_quality: Option<f64>,
}

/// Chooses the adaptive profile from the most recent records.
///
/// Only the last `window` records count. A short history yields the growth
/// profile; otherwise a mean quality below `threshold` yields recovery.
pub fn decide_adaptive(history: &[QueenMemoryRecord], window: usize, threshold: f64) -> AdaptiveDecision {
    let recent = &history[history.len().saturating_sub(window)..];
    if window == 0 || recent.len() < window {
        return AdaptiveDecision {
            profile: AdaptiveProfile::Growth,
            observed: recent.len(),
            mean_quality: None,
        };
    }

    let mean = recent.iter().map(|r| r.quality).sum::<f64>() / recent.len() as f64;
    let profile = if mean < threshold {
        AdaptiveProfile::Recovery
    } else {
        AdaptiveProfile::Growth
    };
    AdaptiveDecision {
        profile,
        observed: recent.len(),
        mean_quality: Some(mean),
    }
}

/// Default strategy of a queen. `history` is only consulted by the adaptive queen.
pub fn plan_strategy(queen: QueenKind, history: &[QueenMemoryRecord], settings: &HiveMindSettings) -> QueenStrategy {
    let (roles, rationale) = match queen {
        QueenKind::Strategic => (
            STRATEGIC_ROLES.to_vec(),
            "long-horizon plan: explore, build, then harvest".to_string(),
        ),
        QueenKind::Tactical => (
            TACTICAL_ROLES.to_vec(),
            "medium-horizon plan: optimise, harden, validate".to_string(),
        ),
        QueenKind::Adaptive => {
            let decision = decide_adaptive(history, settings.adaptive_window, settings.quality_threshold);
            let rationale = match decision.mean_quality {
                None => format!(
                    "growth profile: {} of {} history records, optimistic prior",
                    decision.observed, settings.adaptive_window
                ),
                Some(mean) => format!(
                    "{} profile: mean quality {:.3} over last {} runs (threshold {:.2})",
                    match decision.profile {
                        AdaptiveProfile::Growth => "growth",
                        AdaptiveProfile::Recovery => "recovery",
                    },
                    mean,
                    decision.observed,
                    settings.quality_threshold
                ),
            };
            (decision.profile.roles().to_vec(), rationale)
        }
    };

    QueenStrategy {
        queen,
        roles,
        rationale,
        overridden: false,
    }
}
