use super::utility::*;
use super::TickContext;
use crate::actions::ActionFlags;
use crate::arbitration::CellView;
use crate::belief::Belief;
use crate::error::TickResult;
use crate::host::{AgentClass, Host, Layer};
use crate::machine::run_state_machine_result;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekingLeader {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engaging {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackerState {
    SeekingLeader(SeekingLeader),
    Engaging(Engaging),
}

impl AttackerState {
    pub fn seeking_leader() -> AttackerState {
        AttackerState::SeekingLeader(SeekingLeader {})
    }

    pub fn engaging() -> AttackerState {
        AttackerState::Engaging(Engaging {})
    }

    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<AttackerState>> {
        match self {
            AttackerState::SeekingLeader(state) => state.tick(belief, ctx),
            AttackerState::Engaging(state) => state.tick(belief, ctx),
        }
    }
}

/// Runs attackers, and soldiers until they evolve into attackers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackerRole {
    pub state: AttackerState,
}

impl Default for AttackerRole {
    fn default() -> Self {
        AttackerRole {
            state: AttackerState::seeking_leader(),
        }
    }
}

impl AttackerRole {
    pub fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<()> {
        evolve(ctx)?;

        let before = self.state;

        let result = run_state_machine_result(&mut self.state, "attacker", |state| state.tick(belief, ctx));

        if self.state != before {
            debug!("{} attacker {:?} -> {:?}", ctx.me(), before, self.state);
        }

        result
    }
}

fn evolve<H: Host>(ctx: &mut TickContext<H>) -> TickResult<bool> {
    let me = &ctx.surroundings.me;

    if me.class != AgentClass::Soldier || me.eventual_energy < me.max_energy * ctx.config.combat.evolve_fraction {
        return Ok(false);
    }

    if !ctx.action_flags.consume(ActionFlags::SPAWN) {
        return Ok(false);
    }

    ctx.host.evolve(AgentClass::Attacker)?;

    info!("{} evolved into an attacker", me.id);

    Ok(true)
}

impl SeekingLeader {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<AttackerState>> {
        if belief.leader.is_some() && belief.silent_for(ctx.round()) <= ctx.config.timing.leader_timeout {
            return Ok(Some(AttackerState::engaging()));
        }

        if seek_leader(belief, ctx)? {
            return Ok(Some(AttackerState::engaging()));
        }

        Ok(None)
    }
}

impl Engaging {
    fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<AttackerState>> {
        hear_squad(belief, ctx);

        if belief.silent_for(ctx.round()) > ctx.config.timing.leader_timeout {
            debug!("{} lost touch with {:?}", ctx.me(), belief.leader);

            belief.abandon_leader();

            return Ok(Some(AttackerState::seeking_leader()));
        }

        update_objective(belief, ctx, None);

        let here = ctx.host.location();
        let me = ctx.surroundings.me.clone();
        let threat = ctx
            .surroundings
            .nearest_enemy_unit_within(ctx.config.arbitration.engagement_range)
            .cloned();

        //
        // Emergency retreat, away from whatever is hurting us or from where we were heading.
        //

        if me.energy_fraction() < ctx.config.combat.retreat_fraction {
            let away = threat
                .as_ref()
                .and_then(|t| here.direction_to(t.location))
                .or_else(|| belief.objective_goal(here))
                .map(|d| d.opposite());

            navigate(&mut belief.navigator, ctx, away)?;

            return Ok(None);
        }

        //
        // Defend against units in range before anything else.
        //

        if let Some(threat) = threat {
            if !attack(ctx, threat.location, threat.layer())? {
                navigate_to(&mut belief.navigator, ctx, threat.location)?;
            }

            return Ok(None);
        }

        //
        // Go for the squad target, never firing on a cell we hold.
        //

        if let Some(target) = belief.objective.target() {
            let friendly = ctx.surroundings.view_cell(&*ctx.host, target) == Some(CellView::Friendly);

            if !friendly && attack(ctx, target, Layer::Ground)? {
                return Ok(None);
            }

            if here.range_to(target) > 1 {
                navigate_to(&mut belief.navigator, ctx, target)?;
            }

            return Ok(None);
        }

        if let Some(goal) = belief.objective_goal(here) {
            navigate(&mut belief.navigator, ctx, Some(goal))?;
        } else if let Some(location) = belief.last_leader_location {
            if here.range_to(location) > 2 {
                navigate_to(&mut belief.navigator, ctx, location)?;
            }
        }

        Ok(None)
    }
}
