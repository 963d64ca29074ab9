pub mod attacker;
pub mod follower;
pub mod leader;
pub mod scout;
pub mod utility;

pub use attacker::{AttackerRole, AttackerState};
pub use follower::{FollowerRole, FollowerState};
pub use leader::{LeaderRole, LeaderState};
pub use scout::{ScoutRole, ScoutState};

use crate::actions::ActionFlags;
use crate::comms::Inbox;
use crate::config::SwarmConfig;
use crate::host::{AgentId, Host};
use crate::sensing::Surroundings;

/// Everything a role needs for one tick, apart from the agent's own belief.
pub struct TickContext<'a, H: Host> {
    pub host: &'a mut H,
    pub config: &'a SwarmConfig,
    pub inbox: &'a Inbox,
    pub surroundings: &'a Surroundings,
    pub action_flags: ActionFlags,
}

impl<'a, H: Host> TickContext<'a, H> {
    pub fn me(&self) -> AgentId {
        self.surroundings.me.id
    }

    pub fn round(&self) -> u32 {
        self.surroundings.round
    }
}
