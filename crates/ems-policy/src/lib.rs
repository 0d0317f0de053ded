//! `ems-policy` — pluggable dispatch decision-making.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`context`]  | `DispatchContext`, `PendingCall`, `IdleUnit`, `CostTable` |
//! | [`policy`]   | `DispatchPolicy` trait, `Assignment`                      |
//! | [`greedy`]   | `GreedyNearest` baseline                                  |
//! | [`strategy`] | `Strategy` genome, `StrategyPolicy`                       |
//! | [`scorer`]   | `PriorityModel` hook, `CrispPriority` default             |
//! | [`risk`]     | `RiskModel` hook, `UniformRisk` default                   |
//!
//! The simulator never branches on "which dispatch mode is enabled": it
//! calls whatever [`DispatchPolicy`] it was built with, and the optimizer
//! swaps strategies by constructing new policy values — simulator internals
//! stay untouched.

pub mod context;
pub mod greedy;
pub mod policy;
pub mod risk;
pub mod scorer;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use context::{CostTable, DispatchContext, IdleUnit, PendingCall};
pub use greedy::GreedyNearest;
pub use policy::{Assignment, DispatchPolicy};
pub use risk::{RiskModel, UniformRisk};
pub use scorer::{CrispPriority, PriorityModel};
pub use strategy::{GENE_COUNT, Strategy, StrategyPolicy};
