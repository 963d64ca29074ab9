use squadron::geometry::Location;
use squadron::host::{AgentClass, AgentId, Host, Team};
use squadron::sim::{AgentView, GridWorld, Simulation, WorldConfig};
use squadron::transfer;
use squadron::SwarmConfig;

fn heal_once(world: &mut GridWorld, healer: AgentId, target: AgentId) -> Option<f64> {
    let policy = SwarmConfig::default().heal.policy();

    let mut view = AgentView::enter(world, healer).unwrap();
    let info = view.sense(target).unwrap();
    let healed = transfer::heal(&mut view, &info, &policy).unwrap();
    view.leave();

    healed
}

#[test]
fn healer_keeps_its_reserve() {
    let mut world = GridWorld::new(WorldConfig::default());
    let healer = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(5, 5), 12.0);
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(6, 5), 2.0);

    assert_eq!(heal_once(&mut world, healer, soldier), Some(11.0));
    assert_eq!(world.body(healer).unwrap().energy, 1.0);

    // Down at the reserve, nothing more to give this tick.
    assert_eq!(heal_once(&mut world, healer, soldier), None);

    world.end_tick();

    assert_eq!(world.body(soldier).unwrap().energy, 13.0);
    assert_eq!(world.body(healer).unwrap().energy, 2.0);
}

#[test]
fn second_healer_does_not_overfill() {
    let mut world = GridWorld::new(WorldConfig::default());
    let first = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(5, 5), 60.0);
    let second = world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(5, 6), 60.0);
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(6, 5), 2.0);

    assert_eq!(heal_once(&mut world, first, soldier), Some(38.0));
    assert_eq!(heal_once(&mut world, second, soldier), None);

    world.end_tick();

    assert_eq!(world.body(soldier).unwrap().energy, 40.0);
    assert_eq!(world.body(second).unwrap().energy, 61.0);
}

#[test]
fn squad_healing_never_drains_coordinators() {
    let mut world = GridWorld::new(WorldConfig::default());
    world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, Location::new(10, 10), 15.0);
    let soldier = world.add_agent_with_energy(Team::Red, AgentClass::Soldier, Location::new(11, 10), 4.0);

    let mut simulation = Simulation::new(world, SwarmConfig::default());
    let reserve = simulation.config().heal.upkeep_reserve;

    for _ in 0..40 {
        simulation.step();

        for body in simulation.world().bodies().filter(|b| b.class == AgentClass::Coordinator) {
            assert!(body.energy >= reserve, "coordinator {} down to {}", body.id, body.energy);
        }
    }

    assert!(simulation.world().body(soldier).unwrap().energy > 4.0);
}
