//! Declarative course layout.
//!
//! Props live under groups whose offset composes with each prop's local
//! transform (`world = group ∘ local`). Composition flattens the groups
//! once, so the physics world and the bound render nodes only ever see
//! world transforms.

use glam::Vec3;
use rollway_assets::GeometryBuffer;
use rollway_common::Transform;
use rollway_driver::PoseDriver;
use std::f32::consts::FRAC_PI_2;

use crate::config::SceneConfig;
use crate::props::{self, Prop};

/// Props sharing one parent offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub offset: Transform,
    pub props: Vec<Prop>,
}

impl Group {
    pub fn new(offset: Transform) -> Self {
        Self {
            offset,
            props: Vec::new(),
        }
    }

    pub fn with(mut self, prop: Prop) -> Self {
        self.props.push(prop);
        self
    }
}

/// A flattened set of props in world space, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    props: Vec<Prop>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prop whose transform is already in world space.
    pub fn add(&mut self, prop: Prop) {
        self.props.push(prop);
    }

    /// Compose every prop in `group` with the group offset and add it.
    pub fn add_group(&mut self, group: Group) {
        let Group { offset, props } = group;
        for mut prop in props {
            prop.set_transform(offset.compose(&prop.transform()));
            self.props.push(prop);
        }
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn into_props(self) -> Vec<Prop> {
        self.props
    }
}

pub const COURSE_OFFSET: Vec3 = Vec3::new(2.0, 3.0, 0.0);

const POST_POSITIONS: [[f32; 3]; 8] = [
    [-0.85, 4.0, 0.0],
    [1.5, 1.75, 0.0],
    [1.15, 1.0, 0.0],
    [2.0, 3.0, 0.0],
    [1.25, 5.0, 0.0],
    [-1.0, 7.0, 0.0],
    [-1.5, 5.0, 0.0],
    [1.75, 8.0, 0.0],
];

const SPHERE_POSITIONS: [[f32; 3]; 3] = [[-12.0, 15.0, 0.0], [-9.0, 15.0, 0.0], [-6.0, 13.0, 0.0]];

/// The reference marble-run course: eight posts, the track, two slabs and
/// three spheres under one group, plus the kinematic actor.
pub fn default_course(config: &SceneConfig, track: GeometryBuffer) -> Composition {
    let at = |p: [f32; 3], euler: Vec3| Transform::from_position_euler(Vec3::from_array(p), euler);

    let mut group = Group::new(Transform::from_position(COURSE_OFFSET));
    for (i, p) in POST_POSITIONS.into_iter().enumerate() {
        let name = format!("post{i}");
        group = group.with(props::cylinder(&name, at(p, Vec3::new(FRAC_PI_2, 0.0, 0.0))));
    }
    group = group
        .with(props::track(
            "track",
            at([-3.0, -0.5, 10.5], Vec3::new(0.0, -0.4, 0.0)),
            track,
        ))
        .with(props::slab(
            "box0",
            at([-3.0, 11.0, 0.0], Vec3::new(0.0, 0.0, -0.5)),
            config.box_length,
        ))
        .with(props::slab(
            "box1",
            at([-8.7, 12.3, 0.0], Vec3::new(0.0, 0.0, -0.09)),
            8.0,
        ));
    for (i, p) in SPHERE_POSITIONS.into_iter().enumerate() {
        let name = format!("sphere{i}");
        group = group.with(props::sphere(
            &name,
            at(p, Vec3::ZERO),
            config.sphere.radius,
            config.sphere.restitution,
        ));
    }

    let mut course = Composition::new();
    course.add_group(group);
    // The actor starts where the driver places it at t = 0.
    let start = config.driver.pose_at(0.0).to_transform();
    course.add(props::actor("actor", start, config.actor.half_extents));
    course
}
