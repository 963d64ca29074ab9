use crate::arbitration::{DirectiveKind, Objective, TargetState};
use crate::comms::Directive;
use crate::election::Election;
use crate::geometry::{Direction, Location};
use crate::host::AgentId;
use crate::navigation::Navigator;
use crate::squad::Roster;
use log::*;
use serde::{Deserialize, Serialize};

/// The last squad directive an agent heard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeardDirective {
    pub kind: DirectiveKind,
    pub target: TargetState,
    pub direction: Option<Direction>,
    pub spawn_needed: u32,
    pub heard_at: u32,
}

/// Everything an agent believes about its squad and the world. Owned and mutated only
/// by the agent's own control loop.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub leader: Option<AgentId>,
    pub is_leader: bool,
    pub squad: Option<u32>,
    pub roster: Roster,
    pub joined_at: Option<u32>,
    pub last_directive: Option<HeardDirective>,
    pub last_leader_location: Option<Location>,
    pub objective: Objective,
    pub navigator: Navigator,
    pub election: Election,
    /// Ally a medic is looking after.
    pub dependent: Option<AgentId>,
}

impl Belief {
    pub fn has_squad(&self) -> bool {
        self.is_leader || self.leader.is_some()
    }

    /// The squad's leader, which is `me` for a leader.
    pub fn squad_leader(&self, me: AgentId) -> Option<AgentId> {
        if self.is_leader {
            Some(me)
        } else {
            self.leader
        }
    }

    pub fn is_objective_finder(&self, me: AgentId) -> bool {
        self.objective.is_finder(me)
    }

    pub fn lead(&mut self, squad: u32, round: u32) {
        self.is_leader = true;
        self.leader = None;
        self.squad = Some(squad);
        self.joined_at = Some(round);
    }

    pub fn follow(&mut self, leader: AgentId, squad: Option<u32>, round: u32) {
        if self.leader != Some(leader) {
            debug!("Following {} (squad {:?})", leader, squad);
        }

        self.is_leader = false;
        self.leader = Some(leader);
        self.squad = squad;
        self.joined_at = Some(round);
    }

    /// Forget the leader, keeping what was learnt about the world.
    pub fn abandon_leader(&mut self) {
        self.leader = None;
        self.squad = None;
        self.joined_at = None;
        self.last_directive = None;
        self.navigator.reset();
    }

    pub fn hear(&mut self, directive: &Directive, round: u32) {
        if directive.from_leader() {
            self.last_leader_location = Some(directive.origin);
        }

        self.last_directive = Some(HeardDirective {
            kind: directive.kind,
            target: directive.target,
            direction: directive.direction,
            spawn_needed: directive.spawn_needed,
            heard_at: round,
        });
    }

    /// Ticks since the squad was last heard from, counting from joining when nothing was.
    pub fn silent_for(&self, round: u32) -> u32 {
        let since = self
            .last_directive
            .as_ref()
            .map(|d| d.heard_at)
            .or(self.joined_at)
            .unwrap_or(0);

        round.saturating_sub(since)
    }

    pub fn directive_kind(&self) -> Option<DirectiveKind> {
        self.last_directive.as_ref().map(|d| d.kind)
    }

    /// Where to head for the objective: our own target, else the compass direction we
    /// believe in, else the one last heard.
    pub fn objective_goal(&self, from: Location) -> Option<Direction> {
        self.objective
            .target()
            .and_then(|target| from.direction_to(target))
            .or_else(|| self.objective.direction())
            .or_else(|| self.last_directive.as_ref().and_then(|d| d.direction))
    }
}
