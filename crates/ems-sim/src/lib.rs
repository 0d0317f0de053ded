//! `ems-sim` — the dispatch simulation loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`config`]   | `SimConfig` — per-run knobs                     |
//! | [`builder`]  | `SimBuilder` — validated construction           |
//! | [`sim`]      | `DispatchSimulator` and the six-phase tick loop |
//! | [`metrics`]  | `TickMetrics`, `RunMetrics`                     |
//! | [`observer`] | `SimObserver` callbacks, `NoopObserver`         |
//! | [`error`]    | `SimError`                                      |
//!
//! A simulator is generic over its [`DispatchPolicy`](ems_policy::DispatchPolicy)
//! and [`Router`](ems_graph::Router), owns all mutable state (graph copy,
//! fleet, case log, RNG), and is driven tick by tick.  Two runs built from
//! the same inputs and seed produce identical metrics.

pub mod builder;
pub mod config;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use metrics::{RunMetrics, TickMetrics};
pub use observer::{NoopObserver, SimObserver, TickLog};
pub use sim::DispatchSimulator;
