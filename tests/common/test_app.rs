use bevy::{prelude::*, time::TimeUpdateStrategy};
use std::time::Duration;

use quadflyer::{
    components::{FlightCommand, FlightRequest, Quadrotor, QuadrotorConfig},
    plugins::{LinkPlugin, PhysicsPlugin, PilotInputPlugin, QuadrotorPlugin, StartupSequencePlugin},
    resources::PhysicsConfig,
};

// Builder for creating a test application with customizable configuration
pub struct TestAppBuilder {
    quadrotor_configs: Vec<QuadrotorConfig>,
    physics_config: Option<PhysicsConfig>,
    link: Option<LinkPlugin>,
    pilot_input: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            quadrotor_configs: Vec::new(),
            physics_config: None,
            link: None,
            pilot_input: false,
        }
    }
}

#[allow(dead_code)]
impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quadrotor(mut self, config: QuadrotorConfig) -> Self {
        self.quadrotor_configs.push(config);
        self
    }

    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics_config = Some(config);
        self
    }

    pub fn with_link(mut self, link: LinkPlugin) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_pilot_input(mut self) -> Self {
        self.pilot_input = true;
        self
    }

    pub fn build(self) -> TestApp {
        let physics_config = self.physics_config.unwrap_or_default();
        let time_step = physics_config.clamped_timestep();

        let mut app = App::new();

        // Every update advances time by exactly one fixed step, so FixedUpdate runs once.
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                time_step,
            )))
            .add_plugins(StartupSequencePlugin)
            .add_plugins(PhysicsPlugin::new(physics_config))
            .add_plugins(QuadrotorPlugin::fleet(self.quadrotor_configs));

        if self.pilot_input {
            app.add_plugins(PilotInputPlugin);
        }
        if let Some(link) = self.link {
            app.add_plugins(link);
        }

        // Run an initial update to initialize everything
        app.update();

        TestApp { app, time_step }
    }
}

/// Main test application wrapper
pub struct TestApp {
    pub app: App,
    pub time_step: f64,
}

#[allow(dead_code)]
impl TestApp {
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.update();
        }
    }

    pub fn run_frame(&mut self) {
        self.app.update();
    }

    /// Runs enough fixed steps to cover `seconds` of simulated time.
    pub fn run_for(&mut self, seconds: f64) {
        let steps = (seconds / self.time_step).ceil() as usize;
        self.run_steps(steps);
    }

    pub fn get_state<T: Resource>(&self) -> Option<&T> {
        self.app.world().get_resource::<T>()
    }

    pub fn get_state_mut<T: Resource>(&mut self) -> Option<Mut<T>> {
        self.app.world_mut().get_resource_mut::<T>()
    }

    pub fn insert_resource<T: Resource>(&mut self, resource: T) {
        self.app.world_mut().insert_resource(resource);
    }

    pub fn query_single<T: Component>(&mut self) -> Option<&T> {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.get_single(world).ok()
    }

    pub fn query_single_mut<T: Component>(&mut self) -> Option<Mut<T>> {
        let world = self.app.world_mut();
        let mut query = world.query::<&mut T>();
        query.get_single_mut(world).ok()
    }

    pub fn query_all<T: Component>(&mut self) -> Vec<&T> {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.iter(world).collect()
    }

    /// The only quadrotor in the world.
    pub fn quadrotor(&mut self) -> Entity {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<Entity, With<Quadrotor>>();
        query
            .get_single(world)
            .expect("exactly one quadrotor in the test world")
    }

    pub fn send_flight_request(&mut self, request: FlightRequest) {
        let entity = self.quadrotor();
        self.app
            .world_mut()
            .send_event(FlightCommand { entity, request });
    }

    pub fn send_event<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }
}
