//! The narrow capability surface the coordination core consumes from the simulation host.
//!
//! Everything here is host-owned. The core reads it once per tick and never caches host
//! handles across ticks: an `AgentId` may go stale at any time and every query that takes
//! one can fail with `HostError::Stale`.

use crate::comms::WireMessage;
use crate::error::HostResult;
use crate::geometry::{Direction, Location};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentClass {
    /// Leads squads, heals and spawns.
    Coordinator,
    /// Freshly spawned ground unit, evolves into an attacker.
    Soldier,
    Attacker,
    /// Airborne reconnaissance and medic.
    Scout,
    /// Capturable structure.
    Tower,
    Other,
}

impl AgentClass {
    pub fn is_structure(self) -> bool {
        self == AgentClass::Tower
    }

    pub fn layer(self) -> Layer {
        match self {
            AgentClass::Scout => Layer::Air,
            _ => Layer::Ground,
        }
    }

    /// Mobile non-coordinator units.
    pub fn is_worker(self) -> bool {
        matches!(self, AgentClass::Soldier | AgentClass::Attacker | AgentClass::Scout | AgentClass::Other)
    }

    pub fn code(self) -> i32 {
        match self {
            AgentClass::Coordinator => 0,
            AgentClass::Soldier => 1,
            AgentClass::Attacker => 2,
            AgentClass::Scout => 3,
            AgentClass::Tower => 4,
            AgentClass::Other => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<AgentClass> {
        match code {
            0 => Some(AgentClass::Coordinator),
            1 => Some(AgentClass::Soldier),
            2 => Some(AgentClass::Attacker),
            3 => Some(AgentClass::Scout),
            4 => Some(AgentClass::Tower),
            5 => Some(AgentClass::Other),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
    Neutral,
}

impl Team {
    /// Structures not held by us are valid targets, including neutral ones.
    pub fn holds_against(self, owner: Team) -> bool {
        owner != self
    }

    /// Units that will fight us.
    pub fn is_enemy(self, other: Team) -> bool {
        other != self && other != Team::Neutral
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Ground,
    Air,
}

bitflags! {
    /// Actions the host is still carrying out for an agent.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ActivityFlags: u8 {
        const MOVING = 1;
        const ATTACKING = 1 << 1;
        const MOVE_COOLDOWN = 1 << 2;
        const ATTACK_COOLDOWN = 1 << 3;
    }
}

impl ActivityFlags {
    pub fn movement_busy(self) -> bool {
        self.intersects(ActivityFlags::MOVING | ActivityFlags::MOVE_COOLDOWN)
    }

    pub fn attack_busy(self) -> bool {
        self.intersects(ActivityFlags::ATTACKING | ActivityFlags::ATTACK_COOLDOWN)
    }
}

/// Snapshot of a sensed agent, valid for the tick it was read in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: AgentId,
    pub team: Team,
    pub class: AgentClass,
    pub location: Location,
    pub energy: f64,
    pub eventual_energy: f64,
    pub max_energy: f64,
}

impl AgentInfo {
    pub fn layer(&self) -> Layer {
        self.class.layer()
    }

    pub fn energy_fraction(&self) -> f64 {
        if self.max_energy > 0.0 {
            self.energy / self.max_energy
        } else {
            0.0
        }
    }

    pub fn deficit(&self) -> f64 {
        (self.max_energy - self.energy).max(0.0)
    }
}

pub trait Host {
    fn id(&self) -> AgentId;

    fn class(&self) -> AgentClass;

    fn team(&self) -> Team;

    fn location(&self) -> Location;

    fn facing(&self) -> Direction;

    fn energy(&self) -> f64;

    /// Energy once every in-flight transfer has landed.
    fn eventual_energy(&self) -> f64;

    fn max_energy(&self) -> f64;

    fn activity(&self) -> ActivityFlags;

    /// Elapsed ticks since the run started.
    fn round(&self) -> u32;

    fn nearby_agents(&self, layer: Layer) -> Vec<AgentId>;

    fn sense(&self, id: AgentId) -> HostResult<AgentInfo>;

    fn can_sense(&self, location: Location) -> bool;

    fn agent_at(&self, location: Location, layer: Layer) -> Option<AgentId>;

    fn set_facing(&mut self, direction: Direction) -> HostResult<()>;

    fn move_forward(&mut self) -> HostResult<()>;

    fn move_backward(&mut self) -> HostResult<()>;

    fn can_move(&self, direction: Direction) -> bool;

    fn broadcast(&mut self, message: WireMessage) -> HostResult<()>;

    /// Every message sent last tick by an agent within broadcast range.
    fn messages(&mut self) -> Vec<WireMessage>;

    /// Spawn into the faced cell.
    fn spawn(&mut self, class: AgentClass) -> HostResult<AgentId>;

    fn evolve(&mut self, class: AgentClass) -> HostResult<()>;

    fn transfer_energy(&mut self, amount: f64, location: Location, layer: Layer) -> HostResult<()>;

    fn can_attack(&self, location: Location) -> bool;

    fn attack(&mut self, location: Location, layer: Layer) -> HostResult<()>;

    fn allied_coordinator_locations(&self) -> Vec<Location>;

    /// Direction toward the nearest structure not held by our team, anywhere on the map.
    fn closest_unknown_structure(&self) -> Option<Direction>;
}
