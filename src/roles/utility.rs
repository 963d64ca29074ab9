//! Sub-steps shared by the roles. Each one checks and consumes the action pipeline it
//! needs, so calling one twice in a tick does nothing the second time.

use super::TickContext;
use crate::actions::ActionFlags;
use crate::arbitration::{Claim, DirectiveKind, Observation};
use crate::belief::Belief;
use crate::comms::{Directive, Inbox, Message};
use crate::error::TickResult;
use crate::geometry::{Direction, Location};
use crate::host::{AgentClass, AgentId, Host, Layer};
use crate::navigation::{Navigator, Step};
use crate::transfer::{self, needs_healing};
use log::*;

/// Target claims from `leader`'s squad, in the order they were heard.
pub fn squad_claims(inbox: &Inbox, leader: AgentId) -> Vec<Claim> {
    inbox
        .iter()
        .filter_map(|message| match message {
            Message::LeaderDirective(directive) if directive.leader == leader => Some(Claim::from(directive)),
            Message::ScoutReport(report) if report.leader == Some(leader) => Some(Claim::from(report)),
            _ => None,
        })
        .collect()
}

/// Fold what we see and what the squad says into our objective. `heading` is a direction of
/// our own to explore in; when given, it is what we broadcast instead of any heard one.
pub fn update_objective<H: Host>(belief: &mut Belief, ctx: &mut TickContext<H>, heading: Option<Direction>) {
    let me = ctx.me();

    let claims = belief
        .squad_leader(me)
        .map(|leader| squad_claims(ctx.inbox, leader))
        .unwrap_or_default();

    let observation = Observation {
        heading,
        ..ctx.surroundings.observe(&*ctx.host, belief.objective.target())
    };

    belief
        .objective
        .merge(me, ctx.round(), &observation, &claims, &ctx.config.arbitration);
}

/// Record the roster and directive heard from our leader. False if the leader was silent.
pub fn hear_squad<H: Host>(belief: &mut Belief, ctx: &TickContext<H>) -> bool {
    let leader = match belief.leader {
        Some(leader) => leader,
        None => return false,
    };

    for claim in ctx.inbox.leader_claims() {
        belief.roster.merge_claim(leader, claim);
    }

    match ctx.inbox.leader_directive(leader) {
        Some(directive) => {
            belief.hear(directive, ctx.round());

            true
        }
        None => false,
    }
}

pub fn navigate<H: Host>(navigator: &mut Navigator, ctx: &mut TickContext<H>, goal: Option<Direction>) -> TickResult<Step> {
    if goal.is_none() || ctx.surroundings.activity.movement_busy() || !ctx.action_flags.consume(ActionFlags::MOVE) {
        return Ok(Step::Idle);
    }

    Ok(navigator.pursue(ctx.host, goal)?)
}

pub fn navigate_to<H: Host>(navigator: &mut Navigator, ctx: &mut TickContext<H>, target: Location) -> TickResult<Step> {
    let goal = ctx.host.location().direction_to(target);

    navigate(navigator, ctx, goal)
}

pub fn broadcast<H: Host>(ctx: &mut TickContext<H>, message: &Message) -> TickResult<bool> {
    if !ctx.action_flags.consume(ActionFlags::BROADCAST) {
        return Ok(false);
    }

    ctx.host.broadcast(message.encode()?)?;

    Ok(true)
}

/// Broadcast the squad directive as this agent currently believes it.
pub fn broadcast_directive<H: Host>(belief: &mut Belief, ctx: &mut TickContext<H>, kind: DirectiveKind, spawn_needed: u32) -> TickResult<bool> {
    let me = ctx.me();

    let leader = match belief.squad_leader(me) {
        Some(leader) => leader,
        None => return Ok(false),
    };

    if !ctx.action_flags.available(ActionFlags::BROADCAST) {
        return Ok(false);
    }

    let heard_direction = belief.last_directive.as_ref().and_then(|d| d.direction);

    let directive = Directive {
        sender: me,
        leader,
        squad: belief.squad.unwrap_or(0),
        kind,
        origin: ctx.surroundings.me.location,
        target: belief.objective.take_broadcast_target(),
        direction: belief.objective.direction().or(heard_direction),
        finder: belief.objective.finder(),
        spawn_needed,
    };

    broadcast(ctx, &Message::LeaderDirective(directive))
}

/// Top up the weakest adjacent worker that needs it.
pub fn heal_weakest_adjacent<H: Host>(ctx: &mut TickContext<H>) -> TickResult<Option<f64>> {
    let heal = &ctx.config.heal;

    let target = ctx
        .surroundings
        .weakest_adjacent_ally(|a| a.class.is_worker() && needs_healing(a, heal.heal_fraction))
        .cloned();

    match target {
        Some(target) if ctx.action_flags.consume(ActionFlags::TRANSFER) => Ok(transfer::heal(ctx.host, &target, &heal.policy())?),
        _ => Ok(None),
    }
}

/// Spawn a soldier into the first open adjacent cell. Facing elsewhere costs a tick: we
/// turn now and spawn on the next one.
pub fn spawn_soldier<H: Host>(ctx: &mut TickContext<H>) -> TickResult<Option<AgentId>> {
    let spawn = &ctx.config.spawn;

    if ctx.host.energy() <= spawn.cost * spawn.energy_factor || !ctx.action_flags.available(ActionFlags::SPAWN) {
        return Ok(None);
    }

    let open = match Direction::SPAWN_ORDER.iter().copied().find(|d| ctx.host.can_move(*d)) {
        Some(direction) => direction,
        None => return Ok(None),
    };

    if ctx.host.facing() != open {
        if ctx.surroundings.activity.movement_busy() || !ctx.action_flags.consume(ActionFlags::MOVE) {
            return Ok(None);
        }

        ctx.host.set_facing(open)?;

        debug!("{} turned {} to spawn", ctx.me(), open);

        return Ok(None);
    }

    ctx.action_flags.consume(ActionFlags::SPAWN);

    let spawned = ctx.host.spawn(AgentClass::Soldier)?;

    info!("{} spawned soldier {} to the {}", ctx.me(), spawned, open);

    Ok(Some(spawned))
}

pub fn attack<H: Host>(ctx: &mut TickContext<H>, location: Location, layer: Layer) -> TickResult<bool> {
    if ctx.surroundings.activity.attack_busy() || !ctx.host.can_attack(location) || !ctx.action_flags.consume(ActionFlags::ATTACK) {
        return Ok(false);
    }

    ctx.host.attack(location, layer)?;

    Ok(true)
}

/// Find a squad to belong to: adopt the leader of any sensed coordinator we hear, or
/// head for the closest allied coordinator. True once a leader is adopted.
pub fn seek_leader<H: Host>(belief: &mut Belief, ctx: &mut TickContext<H>) -> TickResult<bool> {
    let round = ctx.round();

    let coordinators: Vec<AgentId> = ctx
        .surroundings
        .allies()
        .filter(|a| a.class == AgentClass::Coordinator)
        .map(|a| a.id)
        .collect();

    if let Some(directive) = ctx.inbox.directives().find(|d| coordinators.contains(&d.sender)) {
        belief.follow(directive.leader, Some(directive.squad), round);
        belief.hear(directive, round);

        if belief.last_leader_location.is_none() {
            belief.last_leader_location = Some(directive.origin);
        }

        return Ok(true);
    }

    let here = ctx.host.location();

    let closest = ctx
        .host
        .allied_coordinator_locations()
        .into_iter()
        .filter(|l| *l != here)
        .min_by_key(|l| (here.range_to(*l), *l));

    if let Some(location) = closest {
        if here.range_to(location) > 1 {
            navigate_to(&mut belief.navigator, ctx, location)?;
        }
    }

    Ok(false)
}
