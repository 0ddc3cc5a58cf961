//! Periodic broadcast tasks: the observer's entries in the scheduler
//! table.
//!
//! Each task reads the world under the shared lock, serializes a
//! projection into a [`WireMessage`], and publishes it on the broadcast
//! channel. The per-client `map` frame is not here; it is sent once at
//! `WebSocket` connect (see [`crate::ws`]).

use territorial_core::scheduler::{
    BOAT_BROADCAST_PERIOD, GRID_UPDATE_PERIOD, SQUARE_INFO_PERIOD, TickTask,
};
use territorial_types::WireMessage;
use tracing::warn;

use crate::encode;
use crate::state::AppState;

/// The broadcast half of the scheduler table.
///
/// Periods per the update schedule: `grid_update` 0.2 s, `square_info`
/// 0.5 s, `boat` 0.1 s.
pub fn broadcast_tasks(state: &AppState) -> Vec<TickTask> {
    let grid_state = state.clone();
    let info_state = state.clone();
    let boat_state = state.clone();

    vec![
        TickTask::new("send_grid_update", GRID_UPDATE_PERIOD, move |game| {
            match encode::encode_grid(game.color_grid.bytes()) {
                Ok(grid) => {
                    grid_state.broadcast(WireMessage::GridUpdate { grid });
                }
                Err(e) => warn!(error = %e, "Grid frame encoding failed, skipping broadcast"),
            }
            Ok(())
        }),
        TickTask::new("send_square_info", SQUARE_INFO_PERIOD, move |game| {
            info_state.broadcast(WireMessage::SquareInfo {
                square_info: game.square_infos(),
            });
            Ok(())
        }),
        TickTask::new("send_boats", BOAT_BROADCAST_PERIOD, move |game| {
            boat_state.broadcast(WireMessage::Boat {
                boats: game.boat_infos(),
            });
            Ok(())
        }),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use territorial_core::Game;
    use territorial_world::{CityIndex, WorldMap};
    use tokio::sync::RwLock;

    use super::*;

    fn make_state() -> AppState {
        let map = WorldMap::synthetic(16, 12, 42);
        let game = Game::new(map, 2, 42, &CityIndex::empty()).unwrap();
        AppState::new(Arc::new(RwLock::new(game)))
    }

    #[tokio::test]
    async fn tasks_publish_their_frames() {
        let state = make_state();
        let mut rx = state.subscribe();
        let mut tasks = broadcast_tasks(&state);

        {
            let mut game = state.game.write().await;
            for task in &mut tasks {
                (task.run)(&mut game).unwrap();
            }
        }

        let mut seen_grid = false;
        let mut seen_info = false;
        let mut seen_boats = false;
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                WireMessage::GridUpdate { grid } => {
                    seen_grid = true;
                    // Round trip: the frame decodes back to the color grid.
                    let decoded = encode::decode_grid(&grid).unwrap();
                    let game = state.game.read().await;
                    assert_eq!(decoded, game.color_grid.bytes());
                }
                WireMessage::SquareInfo { square_info } => {
                    seen_info = true;
                    assert_eq!(square_info.len(), 2);
                }
                WireMessage::Boat { boats } => {
                    seen_boats = true;
                    assert!(boats.is_empty());
                }
                WireMessage::Map { .. } => {}
            }
        }
        assert!(seen_grid && seen_info && seen_boats);
    }

    #[test]
    fn table_names_match_the_schedule() {
        let state = make_state();
        let names: Vec<&str> = broadcast_tasks(&state).iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["send_grid_update", "send_square_info", "send_boats"]);
    }
}
