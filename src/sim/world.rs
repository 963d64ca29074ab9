use crate::comms::{BroadcastChannel, WireMessage};
use crate::geometry::{Direction, Location};
use crate::host::{ActivityFlags, AgentClass, AgentId, AgentInfo, Layer, Team};
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Physics of the reference world. Nothing here is known to the agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    /// Chebyshev sensor range.
    pub sensor_radius: u32,
    /// Euclidean broadcast range.
    pub broadcast_radius: f64,
    pub coordinator_regen: f64,
    pub attack_damage: f64,
    pub spawn_cost: f64,
    /// Spawned units start with this fraction of their max energy.
    pub spawn_energy_fraction: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            width: 30,
            height: 30,
            sensor_radius: 6,
            broadcast_radius: 12.0,
            coordinator_regen: 1.0,
            attack_damage: 6.0,
            spawn_cost: 20.0,
            spawn_energy_fraction: 0.25,
        }
    }
}

pub fn max_energy(class: AgentClass) -> f64 {
    match class {
        AgentClass::Coordinator => 100.0,
        AgentClass::Soldier | AgentClass::Attacker => 40.0,
        AgentClass::Scout => 30.0,
        AgentClass::Tower => 50.0,
        AgentClass::Other => 10.0,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: AgentId,
    pub team: Team,
    pub class: AgentClass,
    pub location: Location,
    pub facing: Direction,
    pub energy: f64,
    /// Transfers that land at the end of the tick.
    pub incoming: f64,
    pub max_energy: f64,
    #[serde(skip)]
    pub activity: ActivityFlags,
}

impl Body {
    pub fn info(&self) -> AgentInfo {
        AgentInfo {
            id: self.id,
            team: self.team,
            class: self.class,
            location: self.location,
            energy: self.energy,
            eventual_energy: (self.energy + self.incoming).min(self.max_energy),
            max_energy: self.max_energy,
        }
    }

    pub fn layer(&self) -> Layer {
        self.class.layer()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned { parent: AgentId, child: AgentId, class: AgentClass },
    Evolved { id: AgentId, class: AgentClass },
    Captured { tower: AgentId, team: Team },
    Died { id: AgentId },
}

pub struct GridWorld {
    pub(super) config: WorldConfig,
    pub(super) round: u32,
    pub(super) obstacles: HashSet<Location>,
    pub(super) bodies: BTreeMap<AgentId, Body>,
    pub(super) channel: BroadcastChannel,
    pub(super) events: Vec<WorldEvent>,
    next_id: u32,
}

impl GridWorld {
    pub fn new(config: WorldConfig) -> GridWorld {
        let channel = BroadcastChannel::new(config.broadcast_radius);

        GridWorld {
            config,
            round: 0,
            obstacles: HashSet::new(),
            bodies: BTreeMap::new(),
            channel,
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn in_bounds(&self, location: Location) -> bool {
        location.x >= 0 && location.y >= 0 && location.x < self.config.width && location.y < self.config.height
    }

    pub fn add_obstacle(&mut self, location: Location) {
        self.obstacles.insert(location);
    }

    /// Block every cell of the inclusive rectangle.
    pub fn add_obstacle_rect(&mut self, min: Location, max: Location) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                self.obstacles.insert(Location::new(x, y));
            }
        }
    }

    pub fn is_obstacle(&self, location: Location) -> bool {
        self.obstacles.contains(&location)
    }

    pub fn occupant(&self, location: Location, layer: Layer) -> Option<&Body> {
        self.bodies.values().find(|b| b.location == location && b.layer() == layer)
    }

    /// Free for a body of `layer`: in bounds, not terrain for ground units, not occupied.
    pub fn is_open(&self, location: Location, layer: Layer) -> bool {
        self.in_bounds(location)
            && !(layer == Layer::Ground && self.is_obstacle(location))
            && self.occupant(location, layer).is_none()
    }

    pub fn add_agent(&mut self, team: Team, class: AgentClass, location: Location) -> AgentId {
        let max = max_energy(class);

        self.add_agent_with_energy(team, class, location, max)
    }

    pub fn add_agent_with_energy(&mut self, team: Team, class: AgentClass, location: Location, energy: f64) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        let max = max_energy(class);

        self.bodies.insert(
            id,
            Body {
                id,
                team,
                class,
                location,
                facing: Direction::North,
                energy: energy.min(max),
                incoming: 0.0,
                max_energy: max,
                activity: ActivityFlags::empty(),
            },
        );

        id
    }

    pub(super) fn spawn_body(&mut self, parent: &Body, class: AgentClass, location: Location) -> AgentId {
        let energy = max_energy(class) * self.config.spawn_energy_fraction;
        let id = self.add_agent_with_energy(parent.team, class, location, energy);

        self.events.push(WorldEvent::Spawned {
            parent: parent.id,
            child: id,
            class,
        });

        id
    }

    pub fn body(&self, id: AgentId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn body_mut(&mut self, id: AgentId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<AgentId> {
        self.bodies.keys().copied().collect()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Messages sent last tick that can be heard from `location`.
    pub fn heard_at(&self, location: Location) -> Vec<WireMessage> {
        self.channel.read(location)
    }

    /// Drain `damage` from whatever stands at `location`. Towers change hands when
    /// drained, units die.
    pub(super) fn damage(&mut self, attacker_team: Team, location: Location, layer: Layer, damage: f64) {
        let (id, died, captured) = match self.bodies.values_mut().find(|b| b.location == location && b.layer() == layer) {
            Some(body) => {
                body.energy -= damage;

                if body.energy > 0.0 {
                    return;
                }

                if body.class.is_structure() {
                    body.team = attacker_team;
                    body.energy = body.max_energy * self.config.spawn_energy_fraction;

                    (body.id, false, true)
                } else {
                    (body.id, true, false)
                }
            }
            None => return,
        };

        if captured {
            info!("Tower {} at {} captured by {:?}", id, location, attacker_team);

            self.events.push(WorldEvent::Captured {
                tower: id,
                team: attacker_team,
            });
        }

        if died {
            debug!("{} died at {}", id, location);

            self.bodies.remove(&id);
            self.events.push(WorldEvent::Died { id });
        }
    }

    /// Deliver last tick's broadcasts, land transfers and regenerate coordinators.
    pub fn end_tick(&mut self) {
        self.channel.end_tick();
        self.round += 1;

        let regen = self.config.coordinator_regen;

        for body in self.bodies.values_mut() {
            body.energy = (body.energy + body.incoming).min(body.max_energy);
            body.incoming = 0.0;

            if body.class == AgentClass::Coordinator {
                body.energy = (body.energy + regen).min(body.max_energy);
            }

            body.activity = ActivityFlags::empty();
        }
    }

    /// Shortest king-move path length for a ground unit, ignoring other units.
    pub fn path_length(&self, from: Location, to: Location) -> Option<usize> {
        use pathfinding::prelude::*;

        let path = bfs(
            &from,
            |&location| {
                Direction::ALL
                    .iter()
                    .map(move |d| location.add(*d))
                    .filter(|next| self.in_bounds(*next) && !self.is_obstacle(*next))
                    .collect::<Vec<_>>()
            },
            |&location| location == to,
        )?;

        Some(path.len().saturating_sub(1))
    }
}
