//! One snapshot of an agent's surroundings per tick.

use crate::arbitration::{CellView, Observation};
use crate::geometry::{Direction, Location};
use crate::host::{ActivityFlags, AgentId, AgentInfo, Host, Layer};
use log::*;
use std::cmp::Ordering;

#[derive(Clone, Debug)]
pub struct Surroundings {
    pub me: AgentInfo,
    pub facing: Direction,
    pub activity: ActivityFlags,
    pub round: u32,
    /// Every other agent sensed this tick, both layers.
    pub agents: Vec<AgentInfo>,
}

impl Surroundings {
    pub fn scan<H: Host>(host: &H) -> Surroundings {
        let me = AgentInfo {
            id: host.id(),
            team: host.team(),
            class: host.class(),
            location: host.location(),
            energy: host.energy(),
            eventual_energy: host.eventual_energy(),
            max_energy: host.max_energy(),
        };

        let agents = [Layer::Ground, Layer::Air]
            .iter()
            .flat_map(|layer| host.nearby_agents(*layer))
            .filter(|id| *id != me.id)
            .filter_map(|id| match host.sense(id) {
                Ok(info) => Some(info),
                Err(err) => {
                    debug!("{} could not sense {}: {}", me.id, id, err);
                    None
                }
            })
            .collect();

        Surroundings {
            me,
            facing: host.facing(),
            activity: host.activity(),
            round: host.round(),
            agents,
        }
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentInfo> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn allies(&self) -> impl Iterator<Item = &AgentInfo> {
        let team = self.me.team;

        self.agents.iter().filter(move |a| a.team == team)
    }

    pub fn enemy_units(&self) -> impl Iterator<Item = &AgentInfo> {
        let team = self.me.team;

        self.agents.iter().filter(move |a| !a.class.is_structure() && team.is_enemy(a.team))
    }

    pub fn hostile_structures(&self) -> impl Iterator<Item = &AgentInfo> {
        let team = self.me.team;

        self.agents.iter().filter(move |a| a.class.is_structure() && team.holds_against(a.team))
    }

    fn nearest<'a, I>(&self, candidates: I) -> Option<&'a AgentInfo>
    where
        I: Iterator<Item = &'a AgentInfo>,
    {
        let origin = self.me.location;

        candidates.min_by_key(|a| (origin.range_to(a.location), a.id))
    }

    pub fn nearest_hostile_structure(&self) -> Option<&AgentInfo> {
        self.nearest(self.hostile_structures())
    }

    pub fn nearest_enemy_unit_within(&self, range: u32) -> Option<&AgentInfo> {
        let origin = self.me.location;

        self.nearest(self.enemy_units().filter(move |a| origin.range_to(a.location) <= range))
    }

    /// The ally matching `filter` with the lowest energy fraction, ties to the lowest id.
    pub fn weakest_ally<F>(&self, filter: F) -> Option<&AgentInfo>
    where
        F: Fn(&AgentInfo) -> bool,
    {
        self.allies().filter(|a| filter(*a)).min_by(|a, b| {
            a.energy_fraction()
                .partial_cmp(&b.energy_fraction())
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
    }

    pub fn weakest_adjacent_ally<F>(&self, filter: F) -> Option<&AgentInfo>
    where
        F: Fn(&AgentInfo) -> bool,
    {
        let origin = self.me.location;

        self.weakest_ally(|a| origin.is_adjacent(a.location) && filter(a))
    }

    /// What stands at `location`, if it is within sensor range.
    pub fn view_cell<H: Host>(&self, host: &H, location: Location) -> Option<CellView> {
        if !host.can_sense(location) {
            return None;
        }

        let occupant = host
            .agent_at(location, Layer::Ground)
            .and_then(|id| self.get(id).cloned().or_else(|| host.sense(id).ok()));

        Some(match occupant {
            Some(info) if self.me.team.holds_against(info.team) => CellView::Hostile,
            Some(_) => CellView::Friendly,
            None => CellView::Empty,
        })
    }

    /// What we saw this tick. `heading` is only filled in by callers that explore.
    pub fn observe<H: Host>(&self, host: &H, believed_target: Option<Location>) -> Observation {
        Observation {
            sighting: self.nearest_hostile_structure().map(|s| s.location),
            target_cell: believed_target.and_then(|location| self.view_cell(host, location)),
            heading: None,
        }
    }
}
