//! Deterministic reference host: a bounded grid with terrain, two movement layers,
//! capturable towers and a one-tick-latency broadcast channel. Used by the tests and the
//! bench binary to run the coordination core end to end.

pub mod view;
pub mod world;

pub use view::*;
pub use world::*;

use crate::agent::Agent;
use crate::config::SwarmConfig;
use crate::host::AgentId;
use std::collections::BTreeMap;

pub struct Simulation {
    world: GridWorld,
    agents: BTreeMap<AgentId, Agent>,
    config: SwarmConfig,
}

impl Simulation {
    pub fn new(world: GridWorld, config: SwarmConfig) -> Simulation {
        Simulation {
            world,
            agents: BTreeMap::new(),
            config,
        }
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Tick every agent alive at the start of the round, in id order, then end the round.
    /// Agents spawned during the round act from the next one.
    pub fn step(&mut self) {
        for id in self.world.ids() {
            if let Some(mut view) = AgentView::enter(&mut self.world, id) {
                let agent = self.agents.entry(id).or_insert_with(|| Agent::new(id));

                agent.tick(&mut view, &self.config);

                view.leave();
            }
        }

        let world = &self.world;
        self.agents.retain(|id, _| world.body(*id).is_some());

        self.world.end_tick();
    }

    pub fn run(&mut self, rounds: u32) {
        for _ in 0..rounds {
            self.step();
        }
    }
}
