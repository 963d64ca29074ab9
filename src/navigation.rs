//! Bug-style pursuit. Head straight for the goal; when blocked, follow the obstacle
//! clockwise until the goal direction opens up and does not lead back to where the
//! trace started.

use crate::error::HostResult;
use crate::geometry::{Direction, Location};
use crate::host::Host;
use log::*;
use serde::{Deserialize, Serialize};

/// What a call to `pursue` did with the agent's movement for this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Idle,
    Turned,
    Moved,
    /// Hit an obstacle and started tracing it.
    Blocked,
    Rotated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    /// Where the current trace started. `Some` exactly while tracing.
    trace_origin: Option<Location>,
}

impl Navigator {
    pub fn is_tracing(&self) -> bool {
        self.trace_origin.is_some()
    }

    pub fn trace_origin(&self) -> Option<Location> {
        self.trace_origin
    }

    pub fn reset(&mut self) {
        self.trace_origin = None;
    }

    pub fn pursue<H: Host>(&mut self, host: &mut H, goal: Option<Direction>) -> HostResult<Step> {
        let goal = match goal {
            Some(goal) => goal,
            None => return Ok(Step::Idle),
        };

        let location = host.location();
        let facing = host.facing();

        match self.trace_origin {
            None => {
                if facing != goal {
                    host.set_facing(goal)?;

                    Ok(Step::Turned)
                } else if host.can_move(facing) {
                    host.move_forward()?;

                    Ok(Step::Moved)
                } else {
                    debug!("{} blocked at {} heading {}, tracing", host.id(), location, goal);

                    self.trace_origin = Some(location);

                    Ok(Step::Blocked)
                }
            }
            Some(origin) => {
                if host.can_move(goal) && location.direction_to(origin) != Some(goal) {
                    self.trace_origin = None;

                    host.set_facing(goal)?;

                    Ok(Step::Turned)
                } else if host.can_move(facing) {
                    host.move_forward()?;

                    Ok(Step::Moved)
                } else {
                    host.set_facing(facing.rotate_right())?;

                    Ok(Step::Rotated)
                }
            }
        }
    }

    /// Pursue `target` by its quantized direction. Idle once there.
    pub fn pursue_location<H: Host>(&mut self, host: &mut H, target: Location) -> HostResult<Step> {
        let goal = host.location().direction_to(target);

        self.pursue(host, goal)
    }
}
