use glam::Vec3;
use rapier3d::math::{Isometry, Real, Vector};
use rapier3d::pipeline::{DebugRenderMode, DebugRenderPipeline, DebugRenderStyle};
use rapier3d::prelude::{
    BroadPhase, CCDSolver, ColliderSet, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, QueryPipeline, RigidBody, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet,
};
use rollway_common::{DebugLine, Pose, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::body::{BodyHandle, BodySpec, ColliderKind, MotionType};
use crate::collider::{build_collider, validate_desc};
use crate::convert::{
    from_isometry, from_vector, isometry_is_finite, pose_to_isometry, to_isometry, to_vector,
};
use crate::debug::LineCollector;
use crate::error::PhysicsError;

/// Standard gravity along -Y.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// An event record produced by every registry mutation and every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicsEvent {
    BodyAdded {
        handle: BodyHandle,
        name: String,
        motion: MotionType,
        collider: ColliderKind,
    },
    BodyRemoved {
        handle: BodyHandle,
        name: String,
    },
    /// Simulation advanced one step of `dt` seconds.
    Stepped { tick: u64, dt: f32 },
    /// A body went non-finite and was restored to `restored`.
    SimulationDivergence {
        handle: BodyHandle,
        name: String,
        restored: Transform,
    },
}

/// Per-body bookkeeping kept alongside the rapier handle.
struct BodyRecord {
    name: String,
    motion: MotionType,
    collider: ColliderKind,
    rigid_body: RigidBodyHandle,
    /// Transform after the most recent step in which the body was finite.
    last_valid: Isometry<Real>,
    /// Kinematic target, re-applied on every step until replaced.
    target: Option<Isometry<Real>>,
}

/// The authoritative physics world.
///
/// Owns every rapier set and pipeline object; `PhysicsPipeline::step` needs
/// mutable access to all of them at once, so they live together. Bodies are
/// indexed by [`BodyHandle`] in a `BTreeMap` so iteration order is
/// deterministic.
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    debug_pipeline: DebugRenderPipeline,

    integration_parameters: IntegrationParameters,
    gravity: Vector<Real>,

    bodies: BTreeMap<BodyHandle, BodyRecord>,
    next_handle: u64,
    tick: u64,
    elapsed: f64,
    event_log: Vec<PhysicsEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            debug_pipeline: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::COLLIDER_SHAPES,
            ),
            integration_parameters: IntegrationParameters::default(),
            gravity: to_vector(gravity),
            bodies: BTreeMap::new(),
            next_handle: 0,
            tick: 0,
            elapsed: 0.0,
            event_log: Vec::new(),
        }
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// All live handles in registration order.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.keys().copied()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[PhysicsEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Register a body. Fails if its collider cannot be built from the
    /// supplied geometry or its physical parameters are unusable.
    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyHandle, PhysicsError> {
        let motion = spec.motion_type();
        let desc = spec.desc();
        validate_desc(desc)?;
        let collider = build_collider(desc)?;

        let position = to_isometry(&desc.transform);
        let builder = match motion {
            MotionType::Fixed => RigidBodyBuilder::fixed(),
            MotionType::Dynamic => RigidBodyBuilder::dynamic().ccd_enabled(desc.ccd),
            MotionType::KinematicPosition => RigidBodyBuilder::kinematic_position_based(),
        };
        let rigid_body = self.rigid_body_set.insert(builder.position(position).build());
        self.collider_set
            .insert_with_parent(collider, rigid_body, &mut self.rigid_body_set);

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let kind = desc.collider.kind();
        tracing::debug!(%handle, name = %desc.name, ?motion, collider = ?kind, "body added");

        self.event_log.push(PhysicsEvent::BodyAdded {
            handle,
            name: desc.name.clone(),
            motion,
            collider: kind,
        });
        self.bodies.insert(
            handle,
            BodyRecord {
                name: desc.name.clone(),
                motion,
                collider: kind,
                rigid_body,
                last_valid: position,
                target: None,
            },
        );
        Ok(handle)
    }

    /// Remove a body and its collider. The handle is invalid afterwards.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        let record = self
            .bodies
            .remove(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        self.rigid_body_set.remove(
            record.rigid_body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        tracing::debug!(%handle, name = %record.name, "body removed");
        self.event_log.push(PhysicsEvent::BodyRemoved {
            handle,
            name: record.name,
        });
        Ok(())
    }

    /// Set the pose a kinematic body will reach at the next step.
    ///
    /// The target stays in effect for every later step until replaced.
    pub fn set_kinematic_target(
        &mut self,
        handle: BodyHandle,
        pose: Pose,
    ) -> Result<(), PhysicsError> {
        let record = self
            .bodies
            .get_mut(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        if record.motion != MotionType::KinematicPosition {
            return Err(PhysicsError::WrongMotionType {
                handle,
                actual: record.motion,
            });
        }
        if !pose.is_finite() {
            return Err(PhysicsError::NonFiniteTarget(handle));
        }
        record.target = Some(pose_to_isometry(&pose));
        Ok(())
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Kinematic targets are applied first, then rapier integrates dynamic
    /// bodies and resolves contacts. Any body left non-finite is restored.
    /// A zero `dt` is a silent no-op, so a paused host may keep calling it.
    /// A negative or non-finite `dt` is ignored with a warning.
    pub fn step(&mut self, dt: f32) {
        if dt == 0.0 {
            tracing::trace!("zero dt, step skipped");
            return;
        }
        if !(dt.is_finite() && dt > 0.0) {
            tracing::warn!(dt, "ignoring step with invalid dt");
            return;
        }
        let _span = tracing::debug_span!("physics_step", tick = self.tick + 1).entered();

        for record in self.bodies.values() {
            let Some(target) = record.target else {
                continue;
            };
            if let Some(body) = self.rigid_body_set.get_mut(record.rigid_body) {
                body.set_next_kinematic_position(target);
            }
        }

        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        self.tick += 1;
        self.elapsed += f64::from(dt);
        let recovered = self.recover_diverged();
        self.event_log.push(PhysicsEvent::Stepped {
            tick: self.tick,
            dt,
        });
        tracing::trace!(tick = self.tick, recovered, "step complete");
    }

    /// Restore every non-finite body to its last valid transform with zero
    /// velocity and record the current transform of every healthy body.
    /// Returns the number of bodies restored.
    fn recover_diverged(&mut self) -> usize {
        let mut recovered = 0;
        for (&handle, record) in self.bodies.iter_mut() {
            let Some(body) = self.rigid_body_set.get_mut(record.rigid_body) else {
                continue;
            };
            if isometry_is_finite(body.position()) {
                record.last_valid = *body.position();
                continue;
            }

            body.set_position(record.last_valid, true);
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(Vector::zeros(), true);
            if record.motion == MotionType::KinematicPosition {
                if record.target.is_some_and(|t| !isometry_is_finite(&t)) {
                    record.target = None;
                }
                // Without this the diverged pose would be re-queued.
                let next = record.target.unwrap_or(record.last_valid);
                body.set_next_kinematic_position(next);
            }

            let restored = from_isometry(&record.last_valid);
            tracing::warn!(
                %handle,
                name = %record.name,
                position = %restored.position,
                "simulation divergence, body restored to last valid transform"
            );
            self.event_log.push(PhysicsEvent::SimulationDivergence {
                handle,
                name: record.name.clone(),
                restored,
            });
            recovered += 1;
        }
        recovered
    }

    fn record(&self, handle: BodyHandle) -> Result<&BodyRecord, PhysicsError> {
        self.bodies
            .get(&handle)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn rigid_body(&self, handle: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        let record = self.record(handle)?;
        self.rigid_body_set
            .get(record.rigid_body)
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Current world transform of a body. Scale is always one.
    pub fn query_transform(&self, handle: BodyHandle) -> Result<Transform, PhysicsError> {
        Ok(from_isometry(self.rigid_body(handle)?.position()))
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(from_vector(self.rigid_body(handle)?.linvel()))
    }

    pub fn motion_type(&self, handle: BodyHandle) -> Result<MotionType, PhysicsError> {
        Ok(self.record(handle)?.motion)
    }

    pub fn collider_kind(&self, handle: BodyHandle) -> Result<ColliderKind, PhysicsError> {
        Ok(self.record(handle)?.collider)
    }

    pub fn body_name(&self, handle: BodyHandle) -> Result<&str, PhysicsError> {
        Ok(self.record(handle)?.name.as_str())
    }

    /// Wireframe of every collider, for the physics debug overlay.
    pub fn debug_lines(&mut self) -> Vec<DebugLine> {
        let mut collector = LineCollector::default();
        self.debug_pipeline.render(
            &mut collector,
            &self.rigid_body_set,
            &self.collider_set,
            &self.impulse_joint_set,
            &self.multibody_joint_set,
            &self.narrow_phase,
        );
        collector.lines
    }

    /// Deterministic digest of the tick and every body transform.
    /// Two worlds built and stepped identically hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        for (handle, record) in &self.bodies {
            mix(&mut h, &handle.0.to_le_bytes());
            let Some(body) = self.rigid_body_set.get(record.rigid_body) else {
                continue;
            };
            let t = from_isometry(body.position());
            for c in t.position.to_array() {
                mix(&mut h, &c.to_le_bytes());
            }
            for c in t.rotation.to_array() {
                mix(&mut h, &c.to_le_bytes());
            }
        }
        h
    }
}
