#![allow(dead_code)]

use squadron::actions::ActionFlags;
use squadron::arbitration::{DirectiveKind, TargetState};
use squadron::comms::{Directive, Inbox, Message};
use squadron::error::TickResult;
use squadron::geometry::Location;
use squadron::host::AgentId;
use squadron::roles::TickContext;
use squadron::sensing::Surroundings;
use squadron::sim::{AgentView, GridWorld};
use squadron::SwarmConfig;

/// Give `id` one turn against `world` the way the simulation does, hearing `heard`.
pub fn tick_as<F>(world: &mut GridWorld, id: AgentId, heard: Vec<Message>, tick: F) -> TickResult<()>
where
    F: FnOnce(&mut TickContext<AgentView>) -> TickResult<()>,
{
    let config = SwarmConfig::default();
    let inbox = Inbox::from_messages(heard);
    let mut view = AgentView::enter(world, id).expect("agent is in the world");
    let surroundings = Surroundings::scan(&view);

    let result = {
        let mut ctx = TickContext {
            host: &mut view,
            config: &config,
            inbox: &inbox,
            surroundings: &surroundings,
            action_flags: ActionFlags::UNSET,
        };

        tick(&mut ctx)
    };

    view.leave();

    result
}

/// What `sender` broadcast during the round that just ended, as heard at `at`.
pub fn heard_from(world: &GridWorld, at: Location, sender: AgentId) -> Vec<Message> {
    world
        .heard_at(at)
        .iter()
        .filter(|wire| wire.sender == sender.0)
        .filter_map(|wire| Message::decode(wire).ok())
        .collect()
}

pub fn directives_from(world: &GridWorld, at: Location, sender: AgentId) -> Vec<Directive> {
    heard_from(world, at, sender)
        .into_iter()
        .filter_map(|message| match message {
            Message::LeaderDirective(directive) => Some(directive),
            _ => None,
        })
        .collect()
}

/// A directive straight from `leader`, standing at `origin`.
pub fn leader_directive(leader: AgentId, origin: Location, kind: DirectiveKind) -> Directive {
    Directive {
        sender: leader,
        leader,
        squad: 1,
        kind,
        origin,
        target: TargetState::Unknown,
        direction: None,
        finder: None,
        spawn_needed: 0,
    }
}
