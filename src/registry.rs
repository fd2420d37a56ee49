use serde::Serialize;

use crate::error::{Result, SimulationError};
use crate::strategy::Strategy;

/// One catalog entry: stable id, the strategy, and help text.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrategyDescriptor {
    pub id: u32,
    pub strategy: Strategy,
    pub description: &'static str,
}

static REGISTRY: [StrategyDescriptor; 5] = [
    StrategyDescriptor {
        id: 0,
        strategy: Strategy::Sequential,
        description: "sequential: one year at a time, one landfall at a time",
    },
    StrategyDescriptor {
        id: 1,
        strategy: Strategy::Precounted,
        description: "precounted: all landfall counts up front, then per-year severity loops",
    },
    StrategyDescriptor {
        id: 2,
        strategy: Strategy::Parallel,
        description: "parallel: years split across worker threads, sequential within each",
    },
    StrategyDescriptor {
        id: 3,
        strategy: Strategy::Batched,
        description: "batched: counts and severities drawn as whole batches per region",
    },
    StrategyDescriptor {
        id: 4,
        strategy: Strategy::ParallelBatched,
        description: "parallel-batched: years split across worker threads, batched within each",
    },
];

/// Every registered strategy, in id order.
pub fn catalog() -> &'static [StrategyDescriptor] {
    &REGISTRY
}

pub fn max_id() -> u32 {
    REGISTRY.iter().map(|d| d.id).max().unwrap_or(0)
}

/// Resolve a raw strategy id.
///
/// Negative ids are a range error ([`SimulationError::InvalidParameter`]);
/// non-negative ids with no entry are [`SimulationError::UnknownStrategy`].
pub fn lookup(strategy_id: i64) -> Result<&'static StrategyDescriptor> {
    if strategy_id < 0 {
        return Err(SimulationError::InvalidParameter {
            field: "strategy_id",
            bound: ">=0",
            value: strategy_id as f64,
        });
    }
    REGISTRY
        .iter()
        .find(|d| i64::from(d.id) == strategy_id)
        .ok_or(SimulationError::UnknownStrategy(strategy_id))
}
