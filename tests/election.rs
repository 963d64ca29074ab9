use squadron::geometry::Location;
use squadron::host::{AgentClass, Team};
use squadron::sim::{GridWorld, Simulation, WorldConfig};
use squadron::{Role, SwarmConfig};

fn coordinators(locations: &[Location]) -> Simulation {
    let mut world = GridWorld::new(WorldConfig::default());

    for location in locations {
        world.add_agent_with_energy(Team::Red, AgentClass::Coordinator, *location, 30.0);
    }

    Simulation::new(world, SwarmConfig::default())
}

fn assert_converged(simulation: &Simulation) {
    for agent in simulation.agents() {
        let belief = agent.belief();

        assert!(belief.has_squad(), "{} never joined a squad", agent.id());

        if let Some(leader) = belief.leader {
            let leader = simulation.agent(leader).unwrap();

            assert!(leader.belief().is_leader, "{} follows non-leader {}", agent.id(), leader.id());
            assert!(matches!(agent.role(), Role::Follower(_)));
        } else {
            assert!(belief.is_leader);
            assert!(matches!(agent.role(), Role::Leader(_)));
        }
    }
}

#[test]
fn nearby_coordinators_agree_on_a_leader() {
    let locations: Vec<Location> = (0..6).map(|i| Location::new(5 + i, 5)).collect();
    let mut simulation = coordinators(&locations);

    simulation.run(10);

    assert_converged(&simulation);

    let leaders = simulation.agents().filter(|a| a.belief().is_leader).count();
    assert!(leaders >= 1);
}

#[test]
fn distant_groups_elect_their_own_leaders() {
    let locations = [
        Location::new(2, 2),
        Location::new(3, 2),
        Location::new(2, 3),
        Location::new(27, 27),
        Location::new(26, 27),
        Location::new(27, 26),
    ];
    let mut simulation = coordinators(&locations);

    simulation.run(15);

    assert_converged(&simulation);

    let leaders: Vec<Location> = simulation
        .agents()
        .filter(|a| a.belief().is_leader)
        .map(|a| simulation.world().body(a.id()).unwrap().location)
        .collect();

    assert!(leaders.iter().any(|l| l.x < 15));
    assert!(leaders.iter().any(|l| l.x > 15));
}

#[test]
fn a_lone_coordinator_leads_itself() {
    let mut simulation = coordinators(&[Location::new(10, 10)]);

    simulation.run(8);

    let agent = simulation.agents().next().unwrap();
    assert!(agent.belief().is_leader);
    assert!(matches!(agent.role(), Role::Leader(_)));
}
