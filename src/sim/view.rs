use super::world::{Body, GridWorld, WorldEvent};
use crate::comms::WireMessage;
use crate::error::{HostError, HostResult};
use crate::geometry::{Direction, Location};
use crate::host::{ActivityFlags, AgentClass, AgentId, AgentInfo, Host, Layer, Team};
use log::*;

/// One agent's window onto the world for the duration of its tick.
///
/// The agent's own body is taken out of the world while the view is open and put back
/// by `leave`.
pub struct AgentView<'w> {
    world: &'w mut GridWorld,
    body: Body,
}

impl<'w> AgentView<'w> {
    /// `None` if `id` is not (or no longer) in the world.
    pub fn enter(world: &'w mut GridWorld, id: AgentId) -> Option<AgentView<'w>> {
        let body = world.bodies.remove(&id)?;

        Some(AgentView { world, body })
    }

    pub fn leave(self) {
        let AgentView { world, body } = self;

        world.bodies.insert(body.id, body);
    }

    fn in_sensor_range(&self, location: Location) -> bool {
        self.body.location.range_to(location) <= self.world.config.sensor_radius
    }

    fn target_cell(&self, direction: Direction) -> Location {
        self.body.location.add(direction)
    }

    fn step_to(&mut self, direction: Direction) -> HostResult<()> {
        if !self.can_move(direction) {
            return Err(HostError::Blocked);
        }

        self.body.location = self.target_cell(direction);
        self.body.activity.insert(ActivityFlags::MOVING);

        Ok(())
    }
}

impl<'w> Host for AgentView<'w> {
    fn id(&self) -> AgentId {
        self.body.id
    }

    fn class(&self) -> AgentClass {
        self.body.class
    }

    fn team(&self) -> Team {
        self.body.team
    }

    fn location(&self) -> Location {
        self.body.location
    }

    fn facing(&self) -> Direction {
        self.body.facing
    }

    fn energy(&self) -> f64 {
        self.body.energy
    }

    fn eventual_energy(&self) -> f64 {
        self.body.info().eventual_energy
    }

    fn max_energy(&self) -> f64 {
        self.body.max_energy
    }

    fn activity(&self) -> ActivityFlags {
        self.body.activity
    }

    fn round(&self) -> u32 {
        self.world.round
    }

    fn nearby_agents(&self, layer: Layer) -> Vec<AgentId> {
        self.world
            .bodies
            .values()
            .filter(|b| b.layer() == layer && self.in_sensor_range(b.location))
            .map(|b| b.id)
            .collect()
    }

    fn sense(&self, id: AgentId) -> HostResult<AgentInfo> {
        if id == self.body.id {
            return Ok(self.body.info());
        }

        let body = self.world.bodies.get(&id).ok_or(HostError::Stale(id))?;

        if !self.in_sensor_range(body.location) {
            return Err(HostError::OutOfRange(id));
        }

        Ok(body.info())
    }

    fn can_sense(&self, location: Location) -> bool {
        self.world.in_bounds(location) && self.in_sensor_range(location)
    }

    fn agent_at(&self, location: Location, layer: Layer) -> Option<AgentId> {
        if !self.can_sense(location) {
            return None;
        }

        if self.body.location == location && self.body.layer() == layer {
            return Some(self.body.id);
        }

        self.world.occupant(location, layer).map(|b| b.id)
    }

    fn set_facing(&mut self, direction: Direction) -> HostResult<()> {
        self.body.facing = direction;

        Ok(())
    }

    fn move_forward(&mut self) -> HostResult<()> {
        self.step_to(self.body.facing)
    }

    fn move_backward(&mut self) -> HostResult<()> {
        self.step_to(self.body.facing.opposite())
    }

    fn can_move(&self, direction: Direction) -> bool {
        self.world.is_open(self.target_cell(direction), self.body.layer())
    }

    fn broadcast(&mut self, message: WireMessage) -> HostResult<()> {
        self.world.channel.post(self.body.location, message);

        Ok(())
    }

    fn messages(&mut self) -> Vec<WireMessage> {
        let me = self.body.id.0;

        self.world
            .channel
            .read(self.body.location)
            .into_iter()
            .filter(|m| m.sender != me)
            .collect()
    }

    fn spawn(&mut self, class: AgentClass) -> HostResult<AgentId> {
        if self.body.class != AgentClass::Coordinator {
            return Err(HostError::Illegal(format!("{:?} cannot spawn", self.body.class)));
        }

        let cost = self.world.config.spawn_cost;
        if self.body.energy < cost {
            return Err(HostError::InsufficientEnergy {
                needed: cost,
                available: self.body.energy,
            });
        }

        let location = self.target_cell(self.body.facing);
        if !self.world.is_open(location, class.layer()) {
            return Err(HostError::Blocked);
        }

        self.body.energy -= cost;

        Ok(self.world.spawn_body(&self.body, class, location))
    }

    fn evolve(&mut self, class: AgentClass) -> HostResult<()> {
        if self.body.class != AgentClass::Soldier || class != AgentClass::Attacker {
            return Err(HostError::Illegal(format!("{:?} cannot evolve into {:?}", self.body.class, class)));
        }

        self.body.class = class;
        self.world.events.push(WorldEvent::Evolved { id: self.body.id, class });

        Ok(())
    }

    fn transfer_energy(&mut self, amount: f64, location: Location, layer: Layer) -> HostResult<()> {
        if self.body.location.range_to(location) > 1 {
            return Err(HostError::Illegal(format!("transfer target {} is not adjacent", location)));
        }

        if amount <= 0.0 || amount > self.body.energy {
            return Err(HostError::InsufficientEnergy {
                needed: amount,
                available: self.body.energy,
            });
        }

        let target = self
            .world
            .bodies
            .values_mut()
            .find(|b| b.location == location && b.layer() == layer)
            .ok_or_else(|| HostError::Illegal(format!("nothing to transfer to at {}", location)))?;

        target.incoming += amount;
        self.body.energy -= amount;

        Ok(())
    }

    fn can_attack(&self, location: Location) -> bool {
        matches!(self.body.class, AgentClass::Soldier | AgentClass::Attacker)
            && !self.body.activity.attack_busy()
            && self.body.location.range_to(location) == 1
    }

    fn attack(&mut self, location: Location, layer: Layer) -> HostResult<()> {
        if !self.can_attack(location) {
            return Err(HostError::Illegal(format!("cannot attack {}", location)));
        }

        let damage = self.world.config.attack_damage;

        trace!("{} attacks {} for {}", self.body.id, location, damage);

        self.world.damage(self.body.team, location, layer, damage);
        self.body.activity.insert(ActivityFlags::ATTACKING);

        Ok(())
    }

    fn allied_coordinator_locations(&self) -> Vec<Location> {
        let team = self.body.team;

        let mut locations: Vec<Location> = self
            .world
            .bodies
            .values()
            .filter(|b| b.team == team && b.class == AgentClass::Coordinator)
            .map(|b| b.location)
            .collect();

        if self.body.class == AgentClass::Coordinator {
            locations.push(self.body.location);
        }

        locations
    }

    fn closest_unknown_structure(&self) -> Option<Direction> {
        let here = self.body.location;
        let team = self.body.team;

        self.world
            .bodies
            .values()
            .filter(|b| b.class.is_structure() && team.holds_against(b.team))
            .min_by_key(|b| (here.range_to(b.location), b.id))
            .and_then(|b| here.direction_to(b.location))
    }
}
