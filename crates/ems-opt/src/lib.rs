//! `ems-opt` — genetic optimization of dispatch strategies.
//!
//! # Crate layout
//!
//! | Module     | Contents                                           |
//! |------------|----------------------------------------------------|
//! | [`config`] | `GaConfig`, `FitnessWeights`                       |
//! | [`ga`]     | `Optimizer`, `Scenario`, `GaReport`                |
//! | [`error`]  | `OptError`                                         |
//!
//! The optimizer evolves [`Strategy`](ems_policy::Strategy) genomes against
//! a fixed scenario (map + simulation config), scoring each candidate by
//! averaging run metrics over a set of Monte-Carlo trials.  Trial seeds
//! depend only on the root seed and the trial index — common random numbers
//! across candidates and generations — so fitness differences reflect the
//! strategies, not sampling luck, and the whole search is reproducible.

pub mod config;
pub mod error;
pub mod ga;


pub use config::{FitnessWeights, GaConfig};
pub use error::{OptError, OptResult};
pub use ga::{GaReport, GenerationStats, Optimizer, Scenario};
