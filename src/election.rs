//! One-shot leader election for coordinators.
//!
//! A leaderless coordinator joins the first squad it hears claimed that still has room,
//! rebroadcasting the claim with itself counted in. If it hears none by its deadline it
//! claims a squad of its own. Deadlines are staggered by id so the first claim has a
//! chance to reach the others before they give up waiting.

use crate::comms::{EstablishLeader, Inbox};
use crate::config::{ElectionConfig, SquadConfig};
use crate::geometry::Location;
use crate::host::AgentId;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ballot {
    /// Nothing to join yet and the deadline has not passed.
    Waiting,
    /// Joined `claim.leader`; `claim` is the rebroadcast with us counted in.
    Joined(EstablishLeader),
    /// Claimed leadership of a new squad.
    Claimed(EstablishLeader),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    started_at: Option<u32>,
    highest_full_squad: u32,
}

impl Election {
    pub fn deadline(me: AgentId, config: &ElectionConfig) -> u32 {
        config.patience + me.0 % config.stagger.max(1)
    }

    /// `here` is where a claim made this round says the new leader stands.
    pub fn vote(&mut self, me: AgentId, here: Location, round: u32, inbox: &Inbox, squad: &SquadConfig, config: &ElectionConfig) -> Ballot {
        let started_at = *self.started_at.get_or_insert(round);

        for claim in inbox.leader_claims() {
            if claim.leader == me || claim.sender == me {
                continue;
            }

            if claim.member_count() < squad.max_squad_size {
                let mut joined = claim.clone();
                joined.join(me);

                info!("{} joined squad {} led by {} ({} members)", me, joined.squad, joined.leader, joined.member_count());

                return Ballot::Joined(joined);
            }

            self.highest_full_squad = self.highest_full_squad.max(claim.squad);
        }

        if round.saturating_sub(started_at) >= Election::deadline(me, config) {
            let squad = self.highest_full_squad + 1;

            info!("{} claimed leadership of squad {}", me, squad);

            return Ballot::Claimed(EstablishLeader::claim(me, squad, here));
        }

        Ballot::Waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comms::Message;

    const HERE: Location = Location { x: 12, y: 7 };

    fn claim(leader: u32, squad: u32, members: &[u32]) -> Message {
        let mut claim = EstablishLeader::claim(AgentId(leader), squad, Location::new(leader as i32, 0));
        for member in members {
            claim.join(AgentId(*member));
        }
        Message::EstablishLeader(claim)
    }

    fn configs(stagger: u32) -> (SquadConfig, ElectionConfig) {
        (SquadConfig::default(), ElectionConfig { patience: 0, stagger })
    }

    #[test]
    fn silence_forces_a_claim() {
        let (squad, config) = configs(1);
        let mut election = Election::default();

        let ballot = election.vote(AgentId(7), HERE, 0, &Inbox::default(), &squad, &config);

        assert_eq!(ballot, Ballot::Claimed(EstablishLeader::claim(AgentId(7), 1, HERE)));
    }

    #[test]
    fn staggered_agents_wait_their_turn() {
        let (squad, config) = configs(4);
        let mut election = Election::default();

        assert_eq!(election.vote(AgentId(6), HERE, 10, &Inbox::default(), &squad, &config), Ballot::Waiting);
        assert_eq!(election.vote(AgentId(6), HERE, 11, &Inbox::default(), &squad, &config), Ballot::Waiting);
        assert!(matches!(election.vote(AgentId(6), HERE, 12, &Inbox::default(), &squad, &config), Ballot::Claimed(_)));
    }

    #[test]
    fn joins_the_first_claim_with_room() {
        let (squad, config) = configs(4);
        let mut election = Election::default();
        let inbox = Inbox::from_messages(vec![claim(1, 1, &[2, 3, 4]), claim(5, 2, &[8])]);

        match election.vote(AgentId(9), HERE, 0, &inbox, &squad, &config) {
            Ballot::Joined(joined) => {
                assert_eq!(joined.leader, AgentId(5));
                assert_eq!(joined.squad, 2);
                assert_eq!(joined.members, vec![AgentId(8), AgentId(9)]);
                assert_eq!(joined.sender, AgentId(9));
                assert_eq!(joined.origin, Location::new(5, 0));
            }
            other => panic!("expected to join, got {:?}", other),
        }
    }

    #[test]
    fn full_squads_bump_the_squad_number() {
        let (squad, config) = configs(1);
        let mut election = Election::default();
        let inbox = Inbox::from_messages(vec![claim(1, 3, &[2, 3, 4])]);

        let ballot = election.vote(AgentId(9), HERE, 0, &inbox, &squad, &config);

        assert_eq!(ballot, Ballot::Claimed(EstablishLeader::claim(AgentId(9), 4, HERE)));
    }

    #[test]
    fn own_claims_echoed_back_are_ignored() {
        let (squad, config) = configs(4);
        let mut election = Election::default();
        let inbox = Inbox::from_messages(vec![claim(4, 1, &[])]);

        assert_eq!(
            election.vote(AgentId(4), HERE, 0, &inbox, &squad, &config),
            Ballot::Claimed(EstablishLeader::claim(AgentId(4), 1, HERE))
        );
    }
}
