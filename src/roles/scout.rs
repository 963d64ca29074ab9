use super::utility::*;
use super::TickContext;
use crate::actions::ActionFlags;
use crate::belief::Belief;
use crate::comms::{Message, ScoutReport};
use crate::error::TickResult;
use crate::host::{AgentClass, AgentInfo, Host};
use crate::machine::run_state_machine_result;
use crate::transfer::{self, needs_healing};
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekingLeader {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patrolling {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoutState {
    SeekingLeader(SeekingLeader),
    Patrolling(Patrolling),
}

impl ScoutState {
    pub fn seeking_leader() -> ScoutState {
        ScoutState::SeekingLeader(SeekingLeader {})
    }

    pub fn patrolling() -> ScoutState {
        ScoutState::Patrolling(Patrolling {})
    }

    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<ScoutState>> {
        match self {
            ScoutState::SeekingLeader(state) => state.tick(belief, ctx),
            ScoutState::Patrolling(state) => state.tick(belief, ctx),
        }
    }
}

/// Airborne reconnaissance that doubles as a medic for its squad's workers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoutRole {
    pub state: ScoutState,
}

impl Default for ScoutRole {
    fn default() -> Self {
        ScoutRole {
            state: ScoutState::seeking_leader(),
        }
    }
}

impl ScoutRole {
    pub fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<()> {
        let before = self.state;

        let result = run_state_machine_result(&mut self.state, "scout", |state| state.tick(belief, ctx));

        if self.state != before {
            debug!("{} scout {:?} -> {:?}", ctx.me(), before, self.state);
        }

        result
    }
}

impl SeekingLeader {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<ScoutState>> {
        report_sighting(belief, ctx)?;

        if (belief.leader.is_some() && belief.silent_for(ctx.round()) <= ctx.config.timing.leader_timeout) || seek_leader(belief, ctx)? {
            return Ok(Some(ScoutState::patrolling()));
        }

        Ok(None)
    }
}

impl Patrolling {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<ScoutState>> {
        hear_squad(belief, ctx);

        if belief.silent_for(ctx.round()) > ctx.config.timing.leader_timeout {
            belief.abandon_leader();
            belief.dependent = None;

            return Ok(Some(ScoutState::seeking_leader()));
        }

        report_sighting(belief, ctx)?;

        let medic_floor = ctx.config.heal.medic_floor;
        let policy = ctx.config.heal.policy();

        if ctx.surroundings.me.energy < medic_floor {
            return_to_leader(belief, ctx)?;

            return Ok(None);
        }

        match choose_dependent(belief, ctx) {
            Some(dependent) => {
                let here = ctx.host.location();

                if here.is_adjacent(dependent.location) || here == dependent.location {
                    if ctx.action_flags.consume(ActionFlags::TRANSFER) {
                        transfer::heal(ctx.host, &dependent, &policy)?;
                    }
                } else {
                    navigate_to(&mut belief.navigator, ctx, dependent.location)?;
                }
            }
            None => return_to_leader(belief, ctx)?,
        }

        Ok(None)
    }
}

/// Report the nearest hostile structure we can see, straight away.
fn report_sighting<H: Host>(belief: &Belief, ctx: &mut TickContext<H>) -> TickResult<bool> {
    let target = match ctx.surroundings.nearest_hostile_structure() {
        Some(target) => target,
        None => return Ok(false),
    };

    let report = ScoutReport {
        sender: ctx.me(),
        leader: belief.leader,
        origin: ctx.surroundings.me.location,
        target: target.location,
        target_class: target.class,
    };

    broadcast(ctx, &Message::ScoutReport(report))
}

/// The ally we are looking after, keeping the remembered one while it is sensed and
/// still needs us.
fn choose_dependent<H: Host>(belief: &mut Belief, ctx: &TickContext<H>) -> Option<AgentInfo> {
    let heal_fraction = ctx.config.heal.heal_fraction;
    let wants_care = |a: &AgentInfo| a.class.is_worker() && a.class != AgentClass::Scout && needs_healing(a, heal_fraction);

    let remembered = belief
        .dependent
        .and_then(|id| ctx.surroundings.get(id))
        .filter(|a| a.team == ctx.surroundings.me.team && wants_care(*a))
        .cloned();

    let dependent = remembered.or_else(|| ctx.surroundings.weakest_ally(wants_care).cloned());

    if dependent.as_ref().map(|d| d.id) != belief.dependent {
        debug!("{} now looking after {:?}", ctx.me(), dependent.as_ref().map(|d| d.id));
    }

    belief.dependent = dependent.as_ref().map(|d| d.id);

    dependent
}

fn return_to_leader<H: Host>(belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<()> {
    if let Some(location) = belief.last_leader_location {
        if ctx.host.location().range_to(location) > 1 {
            navigate_to(&mut belief.navigator, ctx, location)?;
        }
    }

    Ok(())
}
