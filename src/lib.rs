//! Decentralized squad coordination for agents on a discrete grid.
//!
//! Each agent runs its own control loop against a [`host::Host`], agrees on a squad
//! leader with nearby coordinators, shares target sightings over a lossy broadcast
//! channel and navigates toward the squad objective. [`sim`] is a deterministic
//! reference host for running the whole thing in-process.

#![warn(clippy::all)]

pub mod actions;
pub mod agent;
pub mod arbitration;
pub mod belief;
pub mod comms;
pub mod config;
pub mod election;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod machine;
pub mod navigation;
pub mod roles;
pub mod sensing;
pub mod sim;
pub mod squad;
pub mod transfer;

pub use agent::{Agent, Role};
pub use config::SwarmConfig;
pub use host::Host;
