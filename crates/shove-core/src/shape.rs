//! Collision geometry and the default-shape query
//!
//! Base scan ranges are always derived from an actor's archetype (its
//! class-default template), never from the live component, so that every
//! participant computes the same value without replicating it.

use crate::math::abs_max;
use crate::Actor;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Kind of collision shape on a root component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    None,
    Capsule,
    Box,
    Sphere,
}

/// Unscaled geometry of a collision component
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CollisionGeometry {
    #[default]
    None,
    Capsule { radius: f32, half_height: f32 },
    Box { extent: Vec3 },
    Sphere { radius: f32 },
}

impl CollisionGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            CollisionGeometry::None => ShapeKind::None,
            CollisionGeometry::Capsule { .. } => ShapeKind::Capsule,
            CollisionGeometry::Box { .. } => ShapeKind::Box,
            CollisionGeometry::Sphere { .. } => ShapeKind::Sphere,
        }
    }
}

/// A collision component: geometry placed with a rotation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionComponent {
    pub geometry: CollisionGeometry,
    #[serde(default = "identity_quat")]
    pub rotation: Quat,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn identity_quat() -> Quat {
    Quat::IDENTITY
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl CollisionComponent {
    pub fn new(geometry: CollisionGeometry) -> Self {
        Self {
            geometry,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn capsule(radius: f32, half_height: f32) -> Self {
        Self::new(CollisionGeometry::Capsule {
            radius,
            half_height,
        })
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(CollisionGeometry::Sphere { radius })
    }

    pub fn cuboid(extent: Vec3) -> Self {
        Self::new(CollisionGeometry::Box { extent })
    }

    pub fn none() -> Self {
        Self::new(CollisionGeometry::None)
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// The shape with component scale applied
    ///
    /// Capsule radius scales by the smaller planar axis and half-height by Z.
    /// Sphere radius scales by the smallest axis.
    pub fn scaled_shape(&self) -> CollisionShape {
        let scale = self.scale.abs();
        match self.geometry {
            CollisionGeometry::None => CollisionShape::None,
            CollisionGeometry::Capsule {
                radius,
                half_height,
            } => CollisionShape::Capsule {
                radius: radius * scale.x.min(scale.y),
                half_height: half_height * scale.z,
            },
            CollisionGeometry::Box { extent } => CollisionShape::Box {
                half_extent: extent * scale,
            },
            CollisionGeometry::Sphere { radius } => CollisionShape::Sphere {
                radius: radius * scale.min_element(),
            },
        }
    }

    /// Radius of the vertical cylinder that bounds this component
    pub fn bounding_radius(&self) -> f32 {
        match self.scaled_shape() {
            CollisionShape::None => 0.0,
            CollisionShape::Capsule { radius, .. } => radius,
            CollisionShape::Sphere { radius } => radius,
            CollisionShape::Box { half_extent } => half_extent.truncate().length(),
        }
    }
}

impl Default for CollisionComponent {
    fn default() -> Self {
        Self::none()
    }
}

/// Scaled collision shape as used by overlap queries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CollisionShape {
    #[default]
    None,
    Capsule { radius: f32, half_height: f32 },
    Box { half_extent: Vec3 },
    Sphere { radius: f32 },
}

impl CollisionShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            CollisionShape::None => ShapeKind::None,
            CollisionShape::Capsule { .. } => ShapeKind::Capsule,
            CollisionShape::Box { .. } => ShapeKind::Box,
            CollisionShape::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    /// True if every defining dimension is nearly zero
    pub fn is_nearly_zero(&self) -> bool {
        const TOLERANCE: f32 = 1.0e-4;
        match *self {
            CollisionShape::None => true,
            CollisionShape::Capsule {
                radius,
                half_height,
            } => radius <= TOLERANCE && half_height <= TOLERANCE,
            CollisionShape::Box { half_extent } => abs_max(half_extent) <= TOLERANCE,
            CollisionShape::Sphere { radius } => radius <= TOLERANCE,
        }
    }

    /// Largest defining dimension of the shape
    pub fn max_dimension(&self) -> f32 {
        match *self {
            CollisionShape::None => 0.0,
            CollisionShape::Capsule {
                radius,
                half_height,
            } => radius.max(half_height),
            CollisionShape::Box { half_extent } => abs_max(half_extent),
            CollisionShape::Sphere { radius } => radius,
        }
    }
}

/// Collision shape together with the orientation it was authored in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionShapeDescriptor {
    pub shape: CollisionShape,
    pub rotation: Quat,
}

impl CollisionShapeDescriptor {
    pub fn none() -> Self {
        Self {
            shape: CollisionShape::None,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

/// Shape kind of the actor's default root component
pub fn collision_shape_type(actor: &Actor) -> ShapeKind {
    actor.archetype().root.kind()
}

/// Default collision shape of an actor, read from its archetype
///
/// `kind` of [`ShapeKind::None`] infers the kind from the default root.
/// `component` replaces the default root when supplied. A capsule's
/// half-height is never reported smaller than its radius. When the requested
/// kind does not match the component the `None` shape is returned.
pub fn default_collision_shape(
    actor: &Actor,
    kind: ShapeKind,
    component: Option<&CollisionComponent>,
) -> CollisionShapeDescriptor {
    let kind = match kind {
        ShapeKind::None => collision_shape_type(actor),
        kind => kind,
    };
    let component = component.unwrap_or(&actor.archetype().root);

    if kind == ShapeKind::None {
        return CollisionShapeDescriptor {
            shape: CollisionShape::None,
            rotation: component.rotation,
        };
    }

    if component.kind() != kind {
        log::warn!(
            "{}: requested {:?} collision shape but component is {:?}",
            actor.id(),
            kind,
            component.kind()
        );
        return CollisionShapeDescriptor::none();
    }

    let shape = match component.scaled_shape() {
        CollisionShape::Capsule {
            radius,
            half_height,
        } => CollisionShape::Capsule {
            radius,
            half_height: radius.max(half_height),
        },
        shape => shape,
    };

    CollisionShapeDescriptor {
        shape,
        rotation: component.rotation,
    }
}

/// Unscaled radius and half-height of the default root, if it is a capsule
pub fn default_capsule_root(actor: &Actor) -> Option<(f32, f32)> {
    match actor.archetype().root.geometry {
        CollisionGeometry::Capsule {
            radius,
            half_height,
        } => Some((radius, half_height)),
        _ => None,
    }
}

/// Largest dimension of the actor's default collision shape
///
/// This is the base scan range: box takes its largest absolute extent,
/// sphere its radius, capsule the larger of radius and half-height.
/// Missing or degenerate shapes yield 0.
pub fn max_default_collision_shape_size(actor: &Actor, kind: ShapeKind) -> f32 {
    let descriptor = default_collision_shape(actor, kind, None);
    if descriptor.shape.is_nearly_zero() {
        return 0.0;
    }
    descriptor.shape.max_dimension()
}
