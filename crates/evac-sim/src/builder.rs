//! Fluent builder for constructing a [`Sim`].

use evac_agent::{Agent, ProfileSet};
use evac_core::{AgentId, SimConfig};
use evac_grid::CongestionSource;
use evac_route::{Planner, ReplanPolicy};

use crate::{EventSchedule, Scenario, Sim, SimError, SimResult};

/// Builder for [`Sim<P, C, Q>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, tick duration, telemetry cadence (the tick budget
///   is taken from the scenario).
/// - [`Scenario`] — grid, spawns, exit, events.
/// - [`ProfileSet`] — resolves each spawn's class name.
/// - The three algorithm plugs: planner, congestion source, replan policy.
///   [`Scenario::wait_policy`]/[`Scenario::cost_policy`] produce policies
///   with the scenario's threshold overrides applied.
///
/// # Validation
///
/// `build` fails fast on structural scenario problems, unknown class names,
/// and spawns placed on cells the class cannot stand on.  The simulation
/// never starts with partially valid configuration.
///
/// # Example
///
/// ```rust,ignore
/// let scenario = Scenario::load(Path::new("atrium.json"))?;
/// let profiles = ProfileSet::load(Path::new("roles.json"))?;
/// let policy   = scenario.wait_policy();
/// let mut sim = SimBuilder::new(config, scenario, profiles, AStarPlanner, LocalOccupancy, policy)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: Planner, C: CongestionSource, Q: ReplanPolicy> {
    config: SimConfig,
    scenario: Scenario,
    profiles: ProfileSet,
    planner: P,
    congestion: C,
    policy: Q,
}

impl<P: Planner, C: CongestionSource, Q: ReplanPolicy> SimBuilder<P, C, Q> {
    pub fn new(
        config: SimConfig,
        scenario: Scenario,
        profiles: ProfileSet,
        planner: P,
        congestion: C,
        policy: Q,
    ) -> Self {
        Self {
            config,
            scenario,
            profiles,
            planner,
            congestion,
            policy,
        }
    }

    /// Validate all inputs, place the agents, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<P, C, Q>> {
        self.scenario.validate()?;

        let mut grid = self.scenario.build_grid();

        let mut agents = Vec::with_capacity(self.scenario.spawns.len());
        for (i, spawn) in self.scenario.spawns.iter().enumerate() {
            let name = spawn
                .name
                .clone()
                .unwrap_or_else(|| format!("{}-{}", spawn.class, i + 1));

            let profile = self.profiles.get(&spawn.class).ok_or_else(|| {
                SimError::UnknownClass {
                    name: name.clone(),
                    class: spawn.class.clone(),
                }
            })?;

            if !grid.walkable(spawn.position, profile.access) {
                return Err(SimError::SpawnUnwalkable {
                    name,
                    class: spawn.class.clone(),
                    pos: spawn.position,
                });
            }

            grid.occupy(spawn.position);
            agents.push(Agent::new(
                AgentId(i as u32),
                name,
                profile,
                spawn.position,
                self.config.seed,
            ));
        }

        let events: EventSchedule = self.scenario.events.iter().copied().collect();

        // The scenario's tick budget governs the run.
        let mut config = self.config;
        config.total_ticks = self.scenario.total_ticks;
        let clock = config.make_clock();

        Ok(Sim {
            config,
            clock,
            grid,
            exit: self.scenario.exit,
            agents,
            events,
            planner: self.planner,
            congestion: self.congestion,
            policy: self.policy,
            occupancy_dirty: true,
        })
    }
}
