mod common;

use common::*;
use squadron::arbitration::{DirectiveKind, TargetState};
use squadron::belief::Belief;
use squadron::comms::Message;
use squadron::geometry::{Direction, Location};
use squadron::host::{AgentClass, AgentId, Team};
use squadron::roles::{LeaderRole, LeaderState};
use squadron::sim::{GridWorld, WorldConfig, WorldEvent};

fn leading() -> Belief {
    let mut belief = Belief::default();
    belief.lead(1, 0);
    belief
}

#[test]
fn leader_heals_before_moving_off_and_still_broadcasts() {
    let mut world = GridWorld::new(WorldConfig::default());
    let leader = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(10, 10), 60.0);
    world.body_mut(leader).unwrap().facing = Direction::East;
    let tower = Location::new(15, 10);
    world.add_agent(Team::Neutral, AgentClass::Tower, tower);
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(9, 10), 5.0);

    let mut belief = leading();
    let mut role = LeaderRole {
        state: LeaderState::attacking(),
    };

    tick_as(&mut world, leader, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    // Stepped toward the tower, away from the soldier it topped up on the way out.
    let here = world.body(leader).unwrap().location;
    assert_eq!(here, Location::new(11, 10));
    assert_eq!(world.body(soldier).unwrap().energy, 40.0);

    let directives = directives_from(&world, here, leader);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].kind, DirectiveKind::Attack);
    assert_eq!(directives[0].target, TargetState::Hostile(tower));
}

#[test]
fn leader_keeps_its_own_heading_over_echoes() {
    let mut world = GridWorld::new(WorldConfig::default());
    let leader = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(5, 10), 30.0);

    // Well out of sensor range, so only the host's hint points at it.
    world.add_agent(Team::Neutral, AgentClass::Tower, Location::new(25, 10));

    let mut echo = leader_directive(leader, Location::new(3, 10), DirectiveKind::Idle).relayed_by(AgentId(40), Location::new(3, 10));
    echo.direction = Some(Direction::West);

    let mut belief = leading();
    let mut role = LeaderRole {
        state: LeaderState::idle(),
    };

    for _ in 0..2 {
        tick_as(&mut world, leader, vec![Message::LeaderDirective(echo.clone())], |ctx| role.tick(&mut belief, ctx)).unwrap();
        world.end_tick();

        let here = world.body(leader).unwrap().location;
        let directives = directives_from(&world, here, leader);

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].direction, Some(Direction::East));
    }

    assert_eq!(belief.objective.direction(), Some(Direction::East));
}

#[test]
fn leader_turns_one_tick_and_spawns_the_next() {
    let mut world = GridWorld::new(WorldConfig::default());
    let leader = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(10, 10), 100.0);
    world.add_obstacle(Location::new(10, 9));

    let mut belief = leading();
    let mut role = LeaderRole {
        state: LeaderState::spawning(),
    };

    let spawned = |world: &GridWorld| {
        world
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Spawned { class: AgentClass::Soldier, .. }))
            .count()
    };

    tick_as(&mut world, leader, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(world.body(leader).unwrap().facing, Direction::South);
    assert_eq!(spawned(&world), 0);

    tick_as(&mut world, leader, vec![], |ctx| role.tick(&mut belief, ctx)).unwrap();
    world.end_tick();

    assert_eq!(spawned(&world), 1);
    assert!(world
        .bodies()
        .any(|b| b.class == AgentClass::Soldier && b.location == Location::new(10, 11)));
}
