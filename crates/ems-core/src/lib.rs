//! `ems-core` — foundational types for the `rust_ems` dispatch simulator.
//!
//! This crate is a dependency of every other `ems-*` crate.  It intentionally
//! has no `ems-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`ids`]      | `LocationId`, `AmbulanceId`, `EmergencyId`        |
//! | [`location`] | `Location`, `LocationKind`                        |
//! | [`time`]     | `Tick`, `SimClock`                                |
//! | [`rng`]      | `SimRng` (explicit seeded generator)              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod ids;
pub mod location;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AmbulanceId, EmergencyId, LocationId};
pub use location::{Location, LocationKind};
pub use rng::{SimRng, stream_seed};
pub use time::{SimClock, Tick};
