//! Energy sharing between a healer and its dependents.

use crate::error::HostResult;
use crate::host::{AgentInfo, Host};
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// The source gives nothing unless it holds more than this.
    pub floor: f64,
    /// The source never drops below this.
    pub upkeep_reserve: f64,
}

/// How much `source_energy` may give to `target` under `policy`, if anything.
///
/// `min(target deficit, source energy - upkeep reserve)`, only while the source is above
/// the floor and the target's projected energy is still below its maximum.
pub fn transfer_amount(source_energy: f64, target: &AgentInfo, policy: &TransferPolicy) -> Option<f64> {
    if source_energy <= policy.floor || target.eventual_energy >= target.max_energy {
        return None;
    }

    let amount = target.deficit().min(source_energy - policy.upkeep_reserve);

    if amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}

pub fn needs_healing(target: &AgentInfo, heal_fraction: f64) -> bool {
    target.energy < target.max_energy * heal_fraction
}

/// Give `target` what `policy` allows. Returns the amount sent, `None` if nothing was due.
pub fn heal<H: Host>(host: &mut H, target: &AgentInfo, policy: &TransferPolicy) -> HostResult<Option<f64>> {
    let source_energy = host.energy();

    match transfer_amount(source_energy, target, policy) {
        Some(amount) => {
            host.transfer_energy(amount, target.location, target.layer())?;

            debug!("{} healed {} by {:.2} ({:.2} left)", host.id(), target.id, amount, source_energy - amount);

            Ok(Some(amount))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;
    use crate::host::{AgentClass, AgentId, Team};

    const POLICY: TransferPolicy = TransferPolicy {
        floor: 9.375,
        upkeep_reserve: 1.0,
    };

    fn soldier(energy: f64, eventual: f64) -> AgentInfo {
        AgentInfo {
            id: AgentId(9),
            team: Team::Red,
            class: AgentClass::Soldier,
            location: Location::new(1, 0),
            energy,
            eventual_energy: eventual,
            max_energy: 40.0,
        }
    }

    #[test]
    fn fills_the_deficit_when_affordable() {
        assert_eq!(transfer_amount(70.0, &soldier(10.0, 10.0), &POLICY), Some(30.0));
    }

    #[test]
    fn gives_what_it_can_above_the_reserve() {
        assert_eq!(transfer_amount(12.0, &soldier(5.0, 5.0), &POLICY), Some(11.0));
    }

    #[test]
    fn nothing_at_or_below_the_floor() {
        assert_eq!(transfer_amount(9.375, &soldier(5.0, 5.0), &POLICY), None);
    }

    #[test]
    fn nothing_when_the_target_is_already_topped_up_in_flight() {
        assert_eq!(transfer_amount(70.0, &soldier(10.0, 40.0), &POLICY), None);
    }

    #[test]
    fn source_never_drops_below_the_reserve() {
        let policies = [
            POLICY,
            TransferPolicy {
                floor: 5.0,
                upkeep_reserve: 5.0,
            },
            TransferPolicy {
                floor: 0.0,
                upkeep_reserve: 0.0,
            },
        ];

        for policy in policies.iter() {
            for source in (0..=80).map(|e| e as f64 * 0.75) {
                for current in (0..=40).map(|e| e as f64) {
                    let target = soldier(current, current);
                    if let Some(amount) = transfer_amount(source, &target, policy) {
                        assert!(amount > 0.0);
                        assert!(source - amount >= policy.upkeep_reserve - 1e-9);
                        assert!(amount <= target.deficit() + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn half_energy_is_the_healing_line() {
        assert!(needs_healing(&soldier(19.0, 19.0), 0.5));
        assert!(!needs_healing(&soldier(20.0, 20.0), 0.5));
    }
}
