//! The per-tick control loop of a single agent.
//!
//! Read the broadcast snapshot, scan the surroundings, take part in the election if we
//! are a leaderless coordinator, then hand the tick to the role our class and standing
//! call for. Any failure ends the tick early; it is logged and the next tick starts over.

use crate::actions::ActionFlags;
use crate::belief::Belief;
use crate::comms::{Inbox, Message};
use crate::config::SwarmConfig;
use crate::election::Ballot;
use crate::error::TickResult;
use crate::host::{AgentClass, AgentId, Host};
use crate::roles::utility::broadcast;
use crate::roles::*;
use crate::sensing::Surroundings;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A coordinator still waiting on the election.
    Unassigned,
    Leader(LeaderRole),
    Follower(FollowerRole),
    Attacker(AttackerRole),
    Scout(ScoutRole),
    /// Structures and anything else that does not act.
    Inert,
}

impl Role {
    fn for_agent(class: AgentClass, belief: &Belief) -> Role {
        match class {
            AgentClass::Coordinator if belief.is_leader => Role::Leader(LeaderRole::default()),
            AgentClass::Coordinator if belief.leader.is_some() => Role::Follower(FollowerRole::default()),
            AgentClass::Coordinator => Role::Unassigned,
            AgentClass::Soldier | AgentClass::Attacker => Role::Attacker(AttackerRole::default()),
            AgentClass::Scout => Role::Scout(ScoutRole::default()),
            AgentClass::Tower | AgentClass::Other => Role::Inert,
        }
    }

    fn fits(&self, class: AgentClass, belief: &Belief) -> bool {
        match (self, class) {
            (Role::Leader(_), AgentClass::Coordinator) => belief.is_leader,
            (Role::Follower(_), AgentClass::Coordinator) => !belief.is_leader && belief.leader.is_some(),
            (Role::Unassigned, AgentClass::Coordinator) => !belief.has_squad(),
            (Role::Attacker(_), AgentClass::Soldier) | (Role::Attacker(_), AgentClass::Attacker) => true,
            (Role::Scout(_), AgentClass::Scout) => true,
            (Role::Inert, AgentClass::Tower) | (Role::Inert, AgentClass::Other) => true,
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    belief: Belief,
    role: Role,
}

impl Agent {
    pub fn new(id: AgentId) -> Agent {
        Agent {
            id,
            belief: Belief::default(),
            role: Role::Unassigned,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn belief(&self) -> &Belief {
        &self.belief
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn tick<H: Host>(&mut self, host: &mut H, config: &SwarmConfig) {
        let inbox = Inbox::read(host);
        let surroundings = Surroundings::scan(&*host);
        let round = surroundings.round;

        let mut ctx = TickContext {
            host,
            config,
            inbox: &inbox,
            surroundings: &surroundings,
            action_flags: ActionFlags::UNSET,
        };

        if let Err(err) = self.run(&mut ctx) {
            warn!("{} tick {} failed: {}", self.id, round, err);
        }
    }

    fn run<H: Host>(&mut self, ctx: &mut TickContext<H>) -> TickResult<()> {
        let class = ctx.surroundings.me.class;

        if class == AgentClass::Coordinator && !self.belief.has_squad() {
            self.elect(ctx)?;
        }

        if !self.role.fits(class, &self.belief) {
            let role = Role::for_agent(class, &self.belief);

            debug!("{} ({:?}) takes role {:?}", self.id, class, role);

            self.role = role;
        }

        match &mut self.role {
            Role::Leader(role) => role.tick(&mut self.belief, ctx),
            Role::Follower(role) => role.tick(&mut self.belief, ctx),
            Role::Attacker(role) => role.tick(&mut self.belief, ctx),
            Role::Scout(role) => role.tick(&mut self.belief, ctx),
            Role::Unassigned | Role::Inert => Ok(()),
        }
    }

    fn elect<H: Host>(&mut self, ctx: &mut TickContext<H>) -> TickResult<()> {
        let round = ctx.round();

        let ballot = self
            .belief
            .election
            .vote(self.id, ctx.surroundings.me.location, round, ctx.inbox, &ctx.config.squad, &ctx.config.election);

        match ballot {
            Ballot::Waiting => {}
            Ballot::Joined(claim) => {
                self.belief.follow(claim.leader, Some(claim.squad), round);
                self.belief.last_leader_location = Some(claim.origin);

                for member in claim.members.iter() {
                    self.belief.roster.insert(*member);
                }

                broadcast(ctx, &Message::EstablishLeader(claim))?;
            }
            Ballot::Claimed(claim) => {
                self.belief.lead(claim.squad, round);

                broadcast(ctx, &Message::EstablishLeader(claim))?;
            }
        }

        Ok(())
    }
}
