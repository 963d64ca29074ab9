use super::utility::*;
use super::TickContext;
use crate::arbitration::DirectiveKind;
use crate::belief::Belief;
use crate::error::TickResult;
use crate::host::Host;
use crate::machine::run_state_machine_result;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Following {}

/// Out of touch with the leader, heading back to where it was last heard from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regrouping {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowerState {
    Following(Following),
    Regrouping(Regrouping),
}

impl FollowerState {
    pub fn following() -> FollowerState {
        FollowerState::Following(Following {})
    }

    pub fn regrouping() -> FollowerState {
        FollowerState::Regrouping(Regrouping {})
    }

    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<FollowerState>> {
        match self {
            FollowerState::Following(state) => state.tick(belief, ctx),
            FollowerState::Regrouping(state) => state.tick(belief, ctx),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRole {
    pub state: FollowerState,
}

impl Default for FollowerRole {
    fn default() -> Self {
        FollowerRole {
            state: FollowerState::following(),
        }
    }
}

impl FollowerRole {
    pub fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<()> {
        hear_squad(belief, ctx);

        update_objective(belief, ctx, None);

        heal_weakest_adjacent(ctx)?;

        let before = self.state;

        let result = run_state_machine_result(&mut self.state, "follower", |state| state.tick(belief, ctx));

        if self.state != before {
            info!("{} follower {:?} -> {:?}", ctx.me(), before, self.state);
        }

        result
    }
}

/// Whether the squad is still close and talking to us.
fn in_touch<H: Host>(belief: &Belief, ctx: &TickContext<H>) -> bool {
    let round = ctx.round();
    let timing = &ctx.config.timing;

    if belief.silent_for(round) > timing.leader_timeout {
        return false;
    }

    match belief.last_leader_location {
        Some(location) => ctx.surroundings.me.location.distance_to(location) <= ctx.config.movement.leader_leash,
        None => true,
    }
}

impl Following {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<FollowerState>> {
        if !in_touch(belief, ctx) {
            return Ok(Some(FollowerState::regrouping()));
        }

        let kind = match belief.directive_kind() {
            Some(kind) => kind,
            None => return Ok(None),
        };

        match kind {
            DirectiveKind::Spawn => {
                spawn_soldier(ctx)?;
            }
            DirectiveKind::Attack | DirectiveKind::Defend => {
                let goal = belief.objective_goal(ctx.host.location());

                navigate(&mut belief.navigator, ctx, goal)?;
            }
            DirectiveKind::Idle => {}
        }

        let spawn_needed = belief.last_directive.as_ref().map(|d| d.spawn_needed).unwrap_or(0);

        broadcast_directive(belief, ctx, kind, spawn_needed)?;

        Ok(None)
    }
}

impl Regrouping {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<FollowerState>> {
        if in_touch(belief, ctx) {
            return Ok(Some(FollowerState::following()));
        }

        if let Some(location) = belief.last_leader_location {
            navigate_to(&mut belief.navigator, ctx, location)?;
        }

        Ok(None)
    }
}
