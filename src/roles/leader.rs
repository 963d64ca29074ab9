use super::utility::*;
use super::TickContext;
use crate::arbitration::DirectiveKind;
use crate::belief::Belief;
use crate::error::TickResult;
use crate::geometry::furthest_distance;
use crate::host::Host;
use crate::machine::run_state_machine_result;
use crate::squad;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bootstrap {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawning {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idle {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attacking {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderState {
    Bootstrap(Bootstrap),
    Spawning(Spawning),
    Idle(Idle),
    Attacking(Attacking),
}

impl LeaderState {
    pub fn bootstrap() -> LeaderState {
        LeaderState::Bootstrap(Bootstrap {})
    }

    pub fn spawning() -> LeaderState {
        LeaderState::Spawning(Spawning {})
    }

    pub fn idle() -> LeaderState {
        LeaderState::Idle(Idle {})
    }

    pub fn attacking() -> LeaderState {
        LeaderState::Attacking(Attacking {})
    }

    fn default_kind(&self) -> DirectiveKind {
        match self {
            LeaderState::Spawning(_) => DirectiveKind::Spawn,
            LeaderState::Attacking(_) => DirectiveKind::Attack,
            LeaderState::Bootstrap(_) | LeaderState::Idle(_) => DirectiveKind::Idle,
        }
    }

    fn tick<H: Host>(&mut self, muster: &Muster, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<LeaderState>> {
        match self {
            LeaderState::Bootstrap(state) => state.tick(muster, belief, ctx),
            LeaderState::Spawning(state) => state.tick(muster, belief, ctx),
            LeaderState::Idle(state) => state.tick(muster, belief, ctx),
            LeaderState::Attacking(state) => state.tick(muster, belief, ctx),
        }
    }
}

/// Squad facts the leader's states decide on, computed once per tick.
struct Muster {
    elapsed: u32,
    headcount: usize,
    target_known: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRole {
    pub state: LeaderState,
}

impl Default for LeaderRole {
    fn default() -> Self {
        LeaderRole {
            state: LeaderState::bootstrap(),
        }
    }
}

impl LeaderRole {
    pub fn tick<H: Host>(&mut self, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<()> {
        let me = ctx.me();

        for claim in ctx.inbox.leader_claims() {
            let added = belief.roster.merge_claim(me, claim);
            if added > 0 {
                info!("{} roster grew to {} members", me, belief.roster.len() + 1);
            }
        }

        let heading = ctx.host.closest_unknown_structure();

        update_objective(belief, ctx, heading);

        let muster = Muster {
            elapsed: ctx.round(),
            headcount: squad::census(me, ctx.surroundings.me.team, &ctx.surroundings.agents),
            target_known: belief.objective.target().is_some(),
        };

        // Adjacency comes from the start-of-tick scan, so this has to happen before we move.
        let healed = heal_weakest_adjacent(ctx);

        let before = self.state;

        let result = run_state_machine_result(&mut self.state, "leader", |state| state.tick(&muster, belief, ctx));

        if self.state != before {
            info!("{} leader {:?} -> {:?} (headcount {})", me, before, self.state, muster.headcount);
        }

        let engagement_range = ctx.config.arbitration.engagement_range;
        let defend = ctx.surroundings.nearest_enemy_unit_within(engagement_range).is_some();

        let mut candidates = vec![self.state.default_kind()];
        if defend {
            candidates.push(DirectiveKind::Defend);
        }
        if belief.objective.target().is_some() {
            candidates.push(DirectiveKind::Attack);
        }
        let kind = DirectiveKind::resolve(candidates);

        let spawn_needed = squad::spawn_needed(muster.headcount, ctx.config.squad.min_headcount);

        broadcast_directive(belief, ctx, kind, spawn_needed)?;

        healed?;

        result
    }
}

impl Bootstrap {
    fn tick<H: Host>(&mut self, muster: &Muster, _belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<LeaderState>> {
        if muster.elapsed < ctx.config.timing.wake_threshold {
            Ok(Some(LeaderState::spawning()))
        } else {
            Ok(Some(LeaderState::idle()))
        }
    }
}

impl Spawning {
    fn tick<H: Host>(&mut self, muster: &Muster, _belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<LeaderState>> {
        let timing = &ctx.config.timing;

        if muster.headcount >= ctx.config.squad.min_headcount {
            return Ok(Some(LeaderState::attacking()));
        }

        if muster.elapsed >= timing.wake_threshold && muster.elapsed < timing.attack_threshold {
            return Ok(Some(LeaderState::idle()));
        }

        spawn_soldier(ctx)?;

        Ok(None)
    }
}

impl Idle {
    fn tick<H: Host>(&mut self, muster: &Muster, _belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<LeaderState>> {
        if muster.elapsed >= ctx.config.timing.attack_threshold || muster.headcount >= ctx.config.squad.min_headcount {
            return Ok(Some(LeaderState::attacking()));
        }

        Ok(None)
    }
}

impl Attacking {
    fn tick<H: Host>(&mut self, muster: &Muster, belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<Option<LeaderState>> {
        if muster.headcount < ctx.config.squad.min_headcount && !muster.target_known {
            return Ok(Some(LeaderState::spawning()));
        }

        let here = ctx.host.location();
        let spread = furthest_distance(here, ctx.host.allied_coordinator_locations());

        if spread <= ctx.config.movement.cohesion_radius {
            let goal = belief.objective_goal(here);

            navigate(&mut belief.navigator, ctx, goal)?;
        } else {
            debug!("{} holding, coordinators spread over {:.1}", ctx.me(), spread);
        }

        Ok(None)
    }
}
