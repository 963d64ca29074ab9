//! Objective arbitration.
//!
//! Every agent keeps its own `Objective` and merges three inputs into it once per tick:
//! what it senses directly, what it sees at the cell it believes is the target, and the
//! claims its squad broadcast last tick. The first agent to find a target (the finder)
//! keeps priority until its target is invalidated.

use crate::comms::{Directive, ScoutReport};
use crate::config::ArbitrationConfig;
use crate::geometry::{Direction, Location};
use crate::host::AgentId;
use log::*;
use serde::{Deserialize, Serialize};

/// What a squad is told to do. Variants are declared in precedence order, so the
/// derived ordering picks the most urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DirectiveKind {
    Idle,
    Spawn,
    Attack,
    Defend,
}

impl DirectiveKind {
    pub fn code(self) -> i32 {
        match self {
            DirectiveKind::Idle => 0,
            DirectiveKind::Spawn => 1,
            DirectiveKind::Attack => 2,
            DirectiveKind::Defend => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<DirectiveKind> {
        match code {
            0 => Some(DirectiveKind::Idle),
            1 => Some(DirectiveKind::Spawn),
            2 => Some(DirectiveKind::Attack),
            3 => Some(DirectiveKind::Defend),
            _ => None,
        }
    }

    /// The most urgent of `candidates`, `Idle` when there are none.
    pub fn resolve<I>(candidates: I) -> DirectiveKind
    where
        I: IntoIterator<Item = DirectiveKind>,
    {
        candidates.into_iter().max().unwrap_or(DirectiveKind::Idle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    Unknown,
    Hostile(Location),
    /// The target at this location was taken and should be dropped.
    Captured(Location),
}

/// What occupies the believed target cell, when that cell is within sensor range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellView {
    Hostile,
    Friendly,
    Empty,
}

/// Everything the agent itself saw this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Observation {
    /// Nearest sensed structure not held by our team.
    pub sighting: Option<Location>,
    /// `None` when the believed target cell cannot be sensed.
    pub target_cell: Option<CellView>,
    /// Direction of the nearest unexplored structure, when the host tells us one.
    pub heading: Option<Direction>,
}

/// A target claim heard from the squad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Claim {
    pub sender: AgentId,
    pub finder: Option<AgentId>,
    pub target: TargetState,
    pub direction: Option<Direction>,
}

impl From<&Directive> for Claim {
    fn from(directive: &Directive) -> Claim {
        Claim {
            sender: directive.sender,
            finder: directive.finder,
            target: directive.target,
            direction: directive.direction,
        }
    }
}

impl From<&ScoutReport> for Claim {
    fn from(report: &ScoutReport) -> Claim {
        Claim {
            sender: report.sender,
            finder: Some(report.sender),
            target: TargetState::Hostile(report.target),
            direction: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct Released {
    finder: Option<AgentId>,
    location: Location,
    at: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClearReason {
    Captured,
    Destroyed,
    LostSight,
    FinderSilent,
    FinderWithdrew,
    CaptureHeard,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    target: Option<Location>,
    direction: Option<Direction>,
    finder: Option<AgentId>,
    /// Bumped every time the target is cleared.
    epoch: u32,
    /// Last tick the finder itself vouched for the target.
    confirmed_at: u32,
    released: Vec<Released>,
    /// A capture this agent saw and has not announced yet.
    announce: Option<Location>,
}

impl Objective {
    pub fn target(&self) -> Option<Location> {
        self.target
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn finder(&self) -> Option<AgentId> {
        self.finder
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn is_finder(&self, me: AgentId) -> bool {
        self.finder == Some(me)
    }

    /// The target as it should go out on the wire. A pending capture is reported once.
    pub fn take_broadcast_target(&mut self) -> TargetState {
        if let Some(location) = self.announce.take() {
            TargetState::Captured(location)
        } else {
            self.target_state()
        }
    }

    pub fn target_state(&self) -> TargetState {
        self.target.map(TargetState::Hostile).unwrap_or(TargetState::Unknown)
    }

    fn clear(&mut self, round: u32, reason: ClearReason) {
        if let Some(location) = self.target.take() {
            debug!("Objective {} cleared ({:?}), epoch {}", location, reason, self.epoch + 1);

            self.released.push(Released {
                finder: self.finder,
                location,
                at: round,
            });

            if reason == ClearReason::Captured {
                self.announce = Some(location);
            }
        }

        self.finder = None;
        self.epoch += 1;
    }

    fn is_released(&self, finder: Option<AgentId>, location: Location) -> bool {
        self.released.iter().any(|r| r.finder == finder && r.location == location)
    }

    /// Fold this tick's observation and squad claims (in inbox order) into the objective.
    pub fn merge(&mut self, me: AgentId, round: u32, observation: &Observation, claims: &[Claim], config: &ArbitrationConfig) {
        let timeout = config.finder_timeout;

        self.released.retain(|r| round.saturating_sub(r.at) <= timeout);

        if observation.heading.is_some() {
            self.direction = observation.heading;
        }

        //
        // Invalidate what we believe from what we can see.
        //

        if self.target.is_some() {
            match observation.target_cell {
                Some(CellView::Friendly) => self.clear(round, ClearReason::Captured),
                Some(CellView::Empty) => self.clear(round, ClearReason::Destroyed),
                Some(CellView::Hostile) => {}
                None if self.is_finder(me) => self.clear(round, ClearReason::LostSight),
                None => {}
            }
        }

        if self.target.is_some() && !self.is_finder(me) && round.saturating_sub(self.confirmed_at) > timeout {
            self.clear(round, ClearReason::FinderSilent);
        }

        //
        // Captures heard from the squad, and finders withdrawing their own claim.
        //

        for claim in claims {
            match claim.target {
                TargetState::Captured(location) if self.target == Some(location) => {
                    self.clear(round, ClearReason::CaptureHeard);
                }
                TargetState::Unknown if self.target.is_some() && self.finder.is_some() && self.finder == Some(claim.sender) => {
                    self.clear(round, ClearReason::FinderWithdrew);
                }
                _ => {}
            }
        }

        //
        // Our own sighting beats anything heard.
        //

        if let Some(location) = observation.sighting {
            if self.target != Some(location) || !self.is_finder(me) {
                debug!("{} found target {}", me, location);
            }

            self.target = Some(location);
            self.finder = Some(me);
            self.confirmed_at = round;

            return;
        }

        //
        // Claims: the current finder's win, otherwise the first one heard.
        //

        for claim in claims {
            let location = match claim.target {
                TargetState::Hostile(location) => location,
                _ => continue,
            };

            if claim.finder == Some(me) || self.is_released(claim.finder, location) {
                continue;
            }

            match self.finder {
                Some(current) if claim.finder == Some(current) => {
                    self.target = Some(location);

                    if claim.sender == current {
                        self.confirmed_at = round;
                    }
                }
                Some(_) => {}
                None if self.target.is_none() => {
                    debug!("{} adopted target {} from {:?}", me, location, claim.finder);

                    self.target = Some(location);
                    self.finder = claim.finder;
                    self.confirmed_at = round;
                }
                None => {}
            }
        }

        // A heading of our own is never overwritten by one echoed back to us.
        if self.target.is_none() && observation.heading.is_none() {
            if let Some(direction) = claims.iter().find_map(|c| c.direction) {
                self.direction = Some(direction);
            }
        }
    }
}
