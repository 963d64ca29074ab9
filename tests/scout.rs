mod common;

use common::*;
use squadron::belief::Belief;
use squadron::comms::{Message, ScoutReport};
use squadron::geometry::{Direction, Location};
use squadron::host::{AgentClass, AgentId, Team};
use squadron::roles::{ScoutRole, ScoutState};
use squadron::sim::{GridWorld, WorldConfig};

const LEADER: AgentId = AgentId(90);

/// A scout already attached to `LEADER`, last heard from at `leader_at`.
fn scout_at(world: &mut GridWorld, location: Location, energy: f64, leader_at: Location) -> (AgentId, Belief, ScoutRole) {
    let id = world.add_agent_with_energy(Team::Red, AgentClass::Scout, location, energy);

    let mut belief = Belief::default();
    belief.follow(LEADER, Some(1), world.round());
    belief.last_leader_location = Some(leader_at);

    let role = ScoutRole {
        state: ScoutState::patrolling(),
    };

    (id, belief, role)
}

#[test]
fn scout_reports_what_it_sees_straight_away() {
    let mut world = GridWorld::new(WorldConfig::default());
    let tower = Location::new(14, 10);
    world.add_agent(Team::Neutral, AgentClass::Tower, tower);
    let (scout, mut belief, mut role) = scout_at(&mut world, Location::new(10, 10), 30.0, Location::new(10, 8));

    tick_as(&mut world, scout, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    let here = world.body(scout).unwrap().location;

    assert_eq!(
        heard_from(&world, here, scout),
        vec![Message::ScoutReport(ScoutReport {
            sender: scout,
            leader: Some(LEADER),
            origin: Location::new(10, 10),
            target: tower,
            target_class: AgentClass::Tower,
        })]
    );
}

#[test]
fn scout_heals_an_adjacent_dependent() {
    let mut world = GridWorld::new(WorldConfig::default());
    let (scout, mut belief, mut role) = scout_at(&mut world, Location::new(10, 10), 30.0, Location::new(10, 8));
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(11, 10), 5.0);

    tick_as(&mut world, scout, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(belief.dependent, Some(soldier));
    assert_eq!(world.body(scout).unwrap().energy, 1.0);
    assert_eq!(world.body(soldier).unwrap().energy, 34.0);
}

#[test]
fn scout_flies_to_a_dependent_out_of_reach() {
    let mut world = GridWorld::new(WorldConfig::default());
    let (scout, mut belief, mut role) = scout_at(&mut world, Location::new(10, 10), 30.0, Location::new(10, 8));
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(14, 10), 5.0);

    for _ in 0..2 {
        tick_as(&mut world, scout, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
        world.end_tick();
    }

    assert_eq!(belief.dependent, Some(soldier));
    assert_eq!(world.body(scout).unwrap().location, Location::new(11, 10));
    assert_eq!(world.body(scout).unwrap().energy, 30.0);
    assert_eq!(world.body(soldier).unwrap().energy, 5.0);
}

#[test]
fn drained_scout_goes_back_to_its_leader() {
    let mut world = GridWorld::new(WorldConfig::default());
    let (scout, mut belief, mut role) = scout_at(&mut world, Location::new(10, 10), 12.0, Location::new(5, 10));
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(11, 10), 5.0);

    tick_as(&mut world, scout, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    // Enough to give, but below what it takes to keep working as a medic.
    assert_eq!(world.body(soldier).unwrap().energy, 5.0);
    assert_eq!(world.body(scout).unwrap().energy, 12.0);
    assert_eq!(world.body(scout).unwrap().facing, Direction::West);
}

#[test]
fn idle_scout_returns_to_its_leader() {
    let mut world = GridWorld::new(WorldConfig::default());
    let (scout, mut belief, mut role) = scout_at(&mut world, Location::new(10, 10), 30.0, Location::new(10, 4));

    // Healthy workers and other scouts are nobody's dependents.
    world.add_agent(Team::Red, AgentClass::Soldier, Location::new(11, 10));
    world.add_agent_with_energy(Team::Red, AgentClass::Scout, Location::new(9, 10), 2.0);

    tick_as(&mut world, scout, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(belief.dependent, None);
    assert_eq!(world.body(scout).unwrap().location, Location::new(10, 9));
    assert_eq!(role.state, ScoutState::patrolling());
}
