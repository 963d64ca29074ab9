use squadron::arbitration::TargetState;
use squadron::comms::Message;
use squadron::geometry::Location;
use squadron::host::{AgentClass, Team};
use squadron::sim::{GridWorld, Simulation, WorldConfig, WorldEvent};
use squadron::SwarmConfig;

#[test]
fn attacker_captures_a_sighted_tower_once() {
    let mut world = GridWorld::new(WorldConfig::default());
    let leader = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(5, 5), 30.0);
    world.add_agent(Team::Red, AgentClass::Attacker, Location::new(8, 5));
    let tower = world.add_agent(Team::Neutral, AgentClass::Tower, Location::new(9, 5));

    let mut simulation = Simulation::new(world, SwarmConfig::default());
    let mut announcements = 0;

    for _ in 0..80 {
        simulation.step();

        let world = simulation.world();
        let here = world.body(leader).unwrap().location;

        announcements += world
            .heard_at(here)
            .iter()
            .filter(|wire| wire.sender == leader.0)
            .filter_map(|wire| Message::decode(wire).ok())
            .filter(|message| matches!(message, Message::LeaderDirective(d) if matches!(d.target, TargetState::Captured(_))))
            .count();
    }

    let world = simulation.world();

    let captures: Vec<_> = world
        .events()
        .iter()
        .filter(|e| matches!(e, WorldEvent::Captured { .. }))
        .collect();

    assert_eq!(captures, vec![&WorldEvent::Captured { tower, team: Team::Red }]);
    assert_eq!(world.body(tower).unwrap().team, Team::Red);
    assert!(announcements <= 1);

    // Nothing left to go after.
    let leader = simulation.agent(leader).unwrap();
    assert_eq!(leader.belief().objective.target(), None);
}
