//! A computer player that follows the ball

use crate::state::{EventState, PlayerEvent, PongState, Side};
use tube_core::TubeTime;

/// Pick the input for `side` at `now`.
///
/// Serves after losing the ball. Otherwise it moves the paddle towards the
/// ball, staying idle while the ball is within the middle half of the
/// paddle.
pub fn next_event(state: &mut PongState, side: Side, now: TubeTime) -> PlayerEvent {
    let ball = state.ball.position_at(now);
    let player = state.player_mut(side);

    if player.state.at(now).state == EventState::Lost {
        return PlayerEvent::new(side, EventState::Start);
    }

    let position = player.position.at(now);
    let tolerance = player.size.at(now) / 4.0;

    let input = if ball.y < position - tolerance {
        EventState::Up
    } else if ball.y > position + tolerance {
        EventState::Down
    } else {
        EventState::Idle
    };
    PlayerEvent::new(side, input)
}
