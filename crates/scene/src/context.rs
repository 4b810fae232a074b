use rollway_assets::{AssetStore, GeometryBuffer};
use rollway_driver::{KinematicDriver, PoseDriver};
use rollway_kernel::{BodyHandle, Clock, MotionType, PhysicsEvent, PhysicsWorld};
use rollway_render::{DebugOverlay, RenderView, Renderer, SceneGraph, SceneNode};

use crate::binding::{BindingSet, SyncReport};
use crate::composition::{Composition, default_course};
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::props;

/// What happened during one [`SceneContext::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Clock time the driver sampled.
    pub elapsed: f64,
    pub sync: SyncReport,
    /// Bodies restored after going non-finite.
    pub divergences: usize,
}

/// One mounted scene: physics world, clock, driver, render graph and the
/// bindings between them. There is no global scene state.
pub struct SceneContext {
    world: PhysicsWorld,
    clock: Clock,
    driver: KinematicDriver,
    actor: Option<BodyHandle>,
    graph: SceneGraph,
    bindings: BindingSet,
    assets: AssetStore,
    debug: bool,
    overlay: Option<DebugOverlay>,
}

impl SceneContext {
    /// Load the track and compose the default course.
    pub fn mount(config: &SceneConfig) -> Result<Self, SceneError> {
        let track = match &config.track {
            Some(path) => GeometryBuffer::load_json(path)?,
            None => props::default_track_geometry(),
        };
        Self::compose(config, default_course(config, track))
    }

    /// Register every prop as a body plus a bound root node.
    ///
    /// The first kinematic prop becomes the driven actor. Any invalid prop
    /// fails the whole composition.
    pub fn compose(config: &SceneConfig, composition: Composition) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("compose", props = composition.len()).entered();
        config.validate()?;

        let mut world = PhysicsWorld::new(config.gravity);
        let mut graph = SceneGraph::new();
        let mut bindings = BindingSet::new();
        let mut assets = AssetStore::new();
        let mut actor = None;

        for prop in composition.into_props() {
            let transform = prop.transform();
            let motion = prop.spec.motion_type();
            let name = prop.name().to_string();
            let body = world.add_body(prop.spec)?;

            let geometry = assets.register_geometry(prop.geometry);
            let material = assets.register_material(prop.material);
            let node = graph.add_root(
                SceneNode::new(name, transform)
                    .with_geometry(geometry)
                    .with_material(material),
            );
            bindings.bind(body, node);

            if motion == MotionType::KinematicPosition && actor.is_none() {
                actor = Some(body);
            }
        }
        world.drain_events();

        tracing::info!(
            bodies = world.body_count(),
            nodes = graph.len(),
            assets = assets.len(),
            actor = actor.is_some(),
            "scene composed"
        );
        Ok(Self {
            world,
            clock: Clock::new(),
            driver: config.driver,
            actor,
            graph,
            bindings,
            assets,
            debug: config.debug,
            overlay: None,
        })
    }

    /// Advance one frame: clock, then driver target, then physics step,
    /// then transform sync and the optional debug overlay.
    pub fn tick(&mut self, dt: f64) -> Result<FrameReport, SceneError> {
        let _span = tracing::debug_span!("tick", frame = self.clock.frame() + 1).entered();

        let t = self.clock.advance(dt);
        if let Some(actor) = self.actor {
            self.world.set_kinematic_target(actor, self.driver.pose_at(t))?;
        }
        self.world.step(dt as f32);
        let sync = self.bindings.sync(&self.world, &mut self.graph);

        self.overlay = self
            .debug
            .then(|| DebugOverlay::new(self.world.debug_lines()));

        let divergences = self
            .world
            .drain_events()
            .iter()
            .filter(|e| matches!(e, PhysicsEvent::SimulationDivergence { .. }))
            .count();

        Ok(FrameReport {
            frame: self.clock.frame(),
            elapsed: t,
            sync,
            divergences,
        })
    }

    pub fn render<R: Renderer>(&self, renderer: &R, view: &RenderView) -> R::Output {
        renderer.render(&self.graph, view, self.overlay.as_ref())
    }

    /// Start the clock over. The driver replays the same motion.
    pub fn restart_clock(&mut self) {
        self.clock.restart();
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
        if !debug {
            self.overlay = None;
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Overlay produced by the last tick, when debug is on.
    pub fn overlay(&self) -> Option<&DebugOverlay> {
        self.overlay.as_ref()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn actor(&self) -> Option<BodyHandle> {
        self.actor
    }

    /// Release the scene. Bodies and bindings go together.
    pub fn teardown(self) {
        tracing::info!(
            frames = self.clock.frame(),
            bodies = self.world.body_count(),
            "scene torn down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rollway_common::Transform;
    use rollway_kernel::PhysicsError;
    use rollway_render::DebugTextRenderer;

    const DT: f64 = 1.0 / 60.0;

    fn mounted() -> SceneContext {
        SceneContext::mount(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn mount_registers_every_prop() {
        let scene = mounted();
        assert_eq!(scene.world().body_count(), 15);
        assert_eq!(scene.graph().len(), 15);
        assert_eq!(scene.bindings().len(), 15);
        assert!(scene.actor().is_some());
        assert!(scene.world().events().is_empty());
    }

    #[test]
    fn nodes_match_bodies_after_every_tick() {
        let mut scene = mounted();
        for _ in 0..120 {
            let report = scene.tick(DT).unwrap();
            assert_eq!(report.sync.skipped, 0);
            for b in scene.bindings().iter() {
                let body = scene.world().query_transform(b.body).unwrap();
                let node = scene.graph().get(b.node).unwrap().transform;
                assert_eq!(node, body);
            }
        }
    }

    #[test]
    fn actor_follows_driver_each_frame() {
        let mut scene = mounted();
        let actor = scene.actor().unwrap();
        let driver = KinematicDriver::default();
        for _ in 0..10 {
            let report = scene.tick(DT).unwrap();
            let expected = driver.pose_at(report.elapsed).to_transform();
            let actual = scene.world().query_transform(actor).unwrap();
            assert!(actual.approx_eq_pose(&expected, 1e-5));
        }
    }

    #[test]
    fn actor_at_time_zero() {
        let scene = mounted();
        let t = scene.world().query_transform(scene.actor().unwrap()).unwrap();
        let expected = Transform::from_position_euler(Vec3::new(-5.0, -8.0, 0.0), Vec3::new(0.0, -0.1, 0.0));
        assert!(t.approx_eq_pose(&expected, 1e-6));
    }

    #[test]
    fn restarting_clock_replays_actor_pose() {
        let mut scene = mounted();
        let actor = scene.actor().unwrap();
        scene.tick(DT).unwrap();
        let first = scene.world().query_transform(actor).unwrap();
        for _ in 0..20 {
            scene.tick(DT).unwrap();
        }
        scene.restart_clock();
        scene.tick(DT).unwrap();
        assert!(scene.world().query_transform(actor).unwrap().approx_eq_pose(&first, 1e-6));
    }

    #[test]
    fn spheres_fall_and_fixed_props_stay() {
        let mut scene = mounted();
        let handles: Vec<_> = scene.world().handles().collect();
        let before: Vec<_> = handles
            .iter()
            .map(|h| scene.world().query_transform(*h).unwrap())
            .collect();
        for _ in 0..30 {
            scene.tick(DT).unwrap();
        }
        for (h, b) in handles.iter().zip(&before) {
            let now = scene.world().query_transform(*h).unwrap();
            match scene.world().motion_type(*h).unwrap() {
                MotionType::Fixed => assert_eq!(now, *b),
                MotionType::Dynamic => assert!(now.position.y < b.position.y),
                MotionType::KinematicPosition => {}
            }
        }
    }

    #[test]
    fn overlay_only_when_debug_enabled() {
        let mut scene = mounted();
        scene.tick(DT).unwrap();
        assert!(scene.overlay().is_none());

        scene.set_debug(true);
        scene.tick(DT).unwrap();
        assert!(!scene.overlay().unwrap().is_empty());
        let text = scene.render(&DebugTextRenderer::new(), &RenderView::default());
        assert!(text.contains("Debug overlay"));

        scene.set_debug(false);
        assert!(scene.overlay().is_none());
    }

    #[test]
    fn invalid_prop_fails_composition() {
        let mut composition = Composition::new();
        composition.add(props::sphere("bad", Transform::default(), 0.0, 0.1));
        let err = SceneContext::compose(&SceneConfig::default(), composition)
            .err()
            .unwrap();
        assert!(matches!(err, SceneError::Physics(PhysicsError::InvalidGeometry { .. })));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn missing_track_file_fails_mount() {
        let dir = tempfile::tempdir().unwrap();
        let config = SceneConfig {
            track: Some(dir.path().join("track.json")),
            ..SceneConfig::default()
        };
        assert!(matches!(
            SceneContext::mount(&config).err().unwrap(),
            SceneError::Asset(_)
        ));
    }

    #[test]
    fn track_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.json");
        props::default_track_geometry().save_json(&path).unwrap();
        let config = SceneConfig {
            track: Some(path),
            ..SceneConfig::default()
        };
        assert_eq!(SceneContext::mount(&config).unwrap().world().body_count(), 15);
    }

    #[test]
    fn scene_without_actor_still_ticks() {
        let mut composition = Composition::new();
        composition.add(props::sphere("ball", Transform::from_position(Vec3::Y), 0.5, 0.1));
        let mut scene = SceneContext::compose(&SceneConfig::default(), composition).unwrap();
        assert!(scene.actor().is_none());
        assert_eq!(scene.tick(DT).unwrap().sync.synced, 1);
        scene.teardown();
    }
}
