mod common;

use common::*;
use squadron::belief::Belief;
use squadron::geometry::{Direction, Location};
use squadron::host::{AgentClass, AgentId, Team};
use squadron::roles::{AttackerRole, AttackerState};
use squadron::sim::{GridWorld, WorldConfig, WorldEvent};

fn engaged() -> (Belief, AttackerRole) {
    let mut belief = Belief::default();
    belief.follow(AgentId(90), Some(1), 0);

    let role = AttackerRole {
        state: AttackerState::engaging(),
    };

    (belief, role)
}

#[test]
fn wounded_attacker_backs_away_from_the_threat() {
    let mut world = GridWorld::new(WorldConfig::default());
    let attacker = world.add_agent_with_energy(Team::Red, AgentClass::Attacker, Location::new(10, 10), 10.0);
    let enemy = world.add_agent(Team::Blue, AgentClass::Attacker, Location::new(12, 10));
    let (mut belief, mut role) = engaged();

    tick_as(&mut world, attacker, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(world.body(attacker).unwrap().facing, Direction::West);

    tick_as(&mut world, attacker, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(world.body(attacker).unwrap().location, Location::new(9, 10));
    assert_eq!(world.body(enemy).unwrap().energy, 40.0);
}

#[test]
fn healthy_attacker_closes_on_the_threat() {
    let mut world = GridWorld::new(WorldConfig::default());
    let attacker = world.add_agent(Team::Red, AgentClass::Attacker, Location::new(10, 10));
    world.add_agent(Team::Blue, AgentClass::Attacker, Location::new(12, 10));
    let (mut belief, mut role) = engaged();

    tick_as(&mut world, attacker, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(world.body(attacker).unwrap().facing, Direction::East);
}

#[test]
fn soldiers_evolve_once_charged_enough() {
    let mut world = GridWorld::new(WorldConfig::default());
    let charged = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(5, 5), 30.0);
    let short = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(15, 15), 29.0);
    let incoming = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(25, 25), 20.0);
    world.body_mut(incoming).unwrap().incoming = 10.0;

    for id in [charged, short, incoming] {
        let mut belief = Belief::default();
        let mut role = AttackerRole::default();

        tick_as(&mut world, id, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    }

    assert_eq!(world.body(charged).unwrap().class, AgentClass::Attacker);
    assert_eq!(world.body(short).unwrap().class, AgentClass::Soldier);
    assert_eq!(world.body(incoming).unwrap().class, AgentClass::Attacker);

    let evolved: Vec<_> = world
        .events()
        .iter()
        .filter(|e| matches!(e, WorldEvent::Evolved { .. }))
        .cloned()
        .collect();

    assert_eq!(
        evolved,
        vec![
            WorldEvent::Evolved {
                id: charged,
                class: AgentClass::Attacker
            },
            WorldEvent::Evolved {
                id: incoming,
                class: AgentClass::Attacker
            },
        ]
    );
}
