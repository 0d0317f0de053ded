//! The baseline nearest-available policy.

use ems_core::SimRng;

use crate::{Assignment, DispatchContext, DispatchPolicy};

/// Greedy dispatch: walk the pending queue in order (priority descending,
/// spawn ascending) and give each call the closest still-unused idle unit.
///
/// Calls with no reachable unit are left for the next tick.  Ties on travel
/// cost break toward the lower ambulance ID, keeping runs reproducible.
pub struct GreedyNearest;

impl DispatchPolicy for GreedyNearest {
    fn assign(&self, ctx: &DispatchContext<'_>, _rng: &mut SimRng) -> Vec<Assignment> {
        let mut used = vec![false; ctx.idle.len()];
        let mut out = Vec::new();

        for call in ctx.pending {
            let nearest = ctx
                .idle
                .iter()
                .enumerate()
                .filter(|(i, _)| !used[*i])
                .filter_map(|(i, unit)| {
                    ctx.costs
                        .travel_cost(unit.ambulance, call.emergency)
                        .map(|cost| (cost, unit.ambulance, i))
                })
                .min_by_key(|&(cost, id, _)| (cost, id));

            if let Some((_, ambulance, i)) = nearest {
                used[i] = true;
                out.push(Assignment::new(ambulance, call.emergency));
            }
        }

        out
    }

    fn name(&self) -> &'static str {
        "greedy-nearest"
    }
}
