use super::message::*;
use crate::host::{AgentId, Host};
use log::*;

/// Everything heard at the start of this tick, decoded once. A snapshot, not a queue:
/// it is dropped at the end of the tick.
#[derive(Clone, Debug, Default)]
pub struct Inbox {
    messages: Vec<Message>,
}

impl Inbox {
    pub fn read<H: Host>(host: &mut H) -> Inbox {
        let me = host.id();

        let messages = host
            .messages()
            .iter()
            .filter_map(|wire| match Message::decode(wire) {
                Ok(message) => Some(message),
                Err(err) => {
                    debug!("{} dropped message from #{}: {}", me, wire.sender, err);
                    None
                }
            })
            .collect();

        Inbox { messages }
    }

    pub fn from_messages(messages: Vec<Message>) -> Inbox {
        Inbox { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn leader_claims(&self) -> impl Iterator<Item = &EstablishLeader> {
        self.messages.iter().filter_map(|m| match m {
            Message::EstablishLeader(claim) => Some(claim),
            _ => None,
        })
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.messages.iter().filter_map(|m| match m {
            Message::LeaderDirective(directive) => Some(directive),
            _ => None,
        })
    }

    /// Directives of `leader`'s squad, both originals and relays, in arrival order.
    pub fn squad_directives(&self, leader: AgentId) -> impl Iterator<Item = &Directive> {
        self.directives().filter(move |d| d.leader == leader)
    }

    /// The best directive for `leader`'s squad: the leader's own if heard, otherwise the
    /// last relay.
    pub fn leader_directive(&self, leader: AgentId) -> Option<&Directive> {
        self.squad_directives(leader)
            .find(|d| d.from_leader())
            .or_else(|| self.squad_directives(leader).last())
    }
}
