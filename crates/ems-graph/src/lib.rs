//! `ems-graph` — city road graph and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`graph`]  | `CityGraph` (symmetric weight matrix), `TrafficConfig`    |
//! | [`router`] | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`cache`]  | `RouteCache` (version-keyed memo of shortest paths)       |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.  |

pub mod cache;
pub mod error;
pub mod graph;
pub mod router;

#[cfg(test)]
mod tests;

pub use cache::RouteCache;
pub use error::{GraphError, GraphResult};
pub use graph::{CityGraph, TrafficConfig};
pub use router::{DijkstraRouter, Route, Router};
