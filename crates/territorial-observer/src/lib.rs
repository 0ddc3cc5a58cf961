//! Observer API server for the Territorial simulation.
//!
//! Serves the page shell over HTTP and streams the simulation to
//! `WebSocket` subscribers: a one-off `map` frame at connect, then
//! periodic `grid_update`, `square_info` and `boat` frames published by
//! the broadcast tasks in [`broadcast`]. Grid frames are zlib-compressed
//! and hex-framed (see [`encode`]).

pub mod broadcast;
pub mod encode;
pub mod router;
pub mod startup;
pub mod state;
pub mod ws;

pub use broadcast::broadcast_tasks;
pub use encode::{CodecError, decode_grid, encode_grid};
pub use startup::{ObserverConfig, StartupError, spawn_observer};
pub use state::AppState;
