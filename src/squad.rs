//! Squad bookkeeping: who belongs to a squad and how many of them are around.

use crate::comms::EstablishLeader;
use crate::host::{AgentId, AgentInfo, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Friendly mobile agents sensed this tick, not counting the one asking.
pub fn census<'a, I>(me: AgentId, team: Team, sensed: I) -> usize
where
    I: IntoIterator<Item = &'a AgentInfo>,
{
    sensed
        .into_iter()
        .filter(|a| a.id != me && a.team == team && !a.class.is_structure())
        .count()
}

/// How many more members a squad needs to reach `min_headcount`.
pub fn spawn_needed(headcount: usize, min_headcount: usize) -> u32 {
    min_headcount.saturating_sub(headcount) as u32
}

/// Members learnt from election traffic. Only ever grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: BTreeSet<AgentId>,
}

impl Roster {
    pub fn insert(&mut self, member: AgentId) -> bool {
        self.members.insert(member)
    }

    /// Union in every member `claim` lists for `leader`. Returns how many were new.
    pub fn merge_claim(&mut self, leader: AgentId, claim: &EstablishLeader) -> usize {
        if claim.leader != leader {
            return 0;
        }

        claim.members.iter().filter(|m| **m != leader).filter(|m| self.members.insert(**m)).count()
    }

    pub fn contains(&self, member: AgentId) -> bool {
        self.members.contains(&member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }
}
