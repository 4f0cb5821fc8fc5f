//! Push distance and strength resolution
//!
//! All functions here are pure over their inputs. Division is guarded and
//! absent curves act as a multiplier of 1.

use crate::capability::{pushee_ground_speed, PusheeCapability};
use crate::curve::{Curve, FloatCurve};
use crate::math::safe_divide;
use crate::Actor;
use serde::{Deserialize, Serialize};

/// Strength tuning for a push action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionParams {
    /// Base strength before any curve is applied
    pub strength_scalar: f32,
    /// Maps pushee ground speed to a strength multiplier
    pub velocity_to_strength: Option<FloatCurve>,
    /// Maps normalized push distance to a strength multiplier
    pub distance_to_strength: Option<FloatCurve>,
}

impl Default for ActionParams {
    fn default() -> Self {
        Self {
            strength_scalar: 1.0,
            velocity_to_strength: None,
            distance_to_strength: None,
        }
    }
}

impl ActionParams {
    pub fn with_strength_scalar(mut self, strength_scalar: f32) -> Self {
        self.strength_scalar = strength_scalar;
        self
    }

    pub fn with_velocity_curve(mut self, curve: FloatCurve) -> Self {
        self.velocity_to_strength = Some(curve);
        self
    }

    pub fn with_distance_curve(mut self, curve: FloatCurve) -> Self {
        self.distance_to_strength = Some(curve);
        self
    }
}

/// Runtime switches for diagnosing strength scaling
///
/// Only honoured when the `debug-toggles` feature is enabled; shipping
/// builds always apply configured curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugToggles {
    /// Apply the velocity to strength curve
    pub velocity_scaling: bool,
    /// Apply the distance to strength curve
    pub distance_scaling: bool,
}

impl Default for DebugToggles {
    fn default() -> Self {
        Self {
            velocity_scaling: true,
            distance_scaling: true,
        }
    }
}

impl DebugToggles {
    fn velocity_enabled(&self) -> bool {
        !cfg!(feature = "debug-toggles") || self.velocity_scaling
    }

    fn distance_enabled(&self) -> bool {
        !cfg!(feature = "debug-toggles") || self.distance_scaling
    }
}

/// Distance between pushee and pusher relative to their combined radii
///
/// Returns 0 when both radii are zero.
pub fn normalized_push_distance(pushee: &Actor, pusher: &Actor, distance: f32) -> f32 {
    let combined_radius = pushee.simple_collision_radius() + pusher.simple_collision_radius();
    safe_divide(distance, combined_radius)
}

/// Computes push strength from action params and the pushee's motion
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthResolver {
    toggles: DebugToggles,
}

impl StrengthResolver {
    pub fn new(toggles: DebugToggles) -> Self {
        Self { toggles }
    }

    pub fn toggles(&self) -> DebugToggles {
        self.toggles
    }

    pub fn set_toggles(&mut self, toggles: DebugToggles) {
        self.toggles = toggles;
    }

    /// Strength of a push at `distance` using the curves in `params`
    pub fn push_strength(
        &self,
        pushee: &dyn PusheeCapability,
        distance: f32,
        params: &ActionParams,
    ) -> f32 {
        self.push_strength_simple(
            pushee,
            params.velocity_to_strength.as_ref().map(|c| c as &dyn Curve),
            params.distance_to_strength.as_ref().map(|c| c as &dyn Curve),
            distance,
            params.strength_scalar,
        )
    }

    /// Strength of a push from explicit curves
    ///
    /// Starts at `strength_scalar`, multiplied by the velocity curve sampled at
    /// the pushee's ground speed and by the distance curve sampled at
    /// `distance`.
    pub fn push_strength_simple(
        &self,
        pushee: &dyn PusheeCapability,
        velocity_curve: Option<&dyn Curve>,
        distance_curve: Option<&dyn Curve>,
        distance: f32,
        strength_scalar: f32,
    ) -> f32 {
        let mut strength = strength_scalar;

        if let Some(curve) = velocity_curve {
            if self.toggles.velocity_enabled() {
                strength *= curve.sample(pushee_ground_speed(pushee));
            }
        }

        if let Some(curve) = distance_curve {
            if self.toggles.distance_enabled() {
                strength *= curve.sample(distance);
            }
        }

        strength
    }

    /// Final push strength
    ///
    /// With `override_strength` the supplied `strength_scalar` is used as is.
    /// Otherwise the curve strength at `normalized_distance` is scaled by it.
    pub fn calculate_push_strength(
        &self,
        pushee: &dyn PusheeCapability,
        override_strength: bool,
        strength_scalar: f32,
        normalized_distance: f32,
        params: &ActionParams,
    ) -> f32 {
        if override_strength {
            return strength_scalar;
        }
        self.push_strength(pushee, normalized_distance, params) * strength_scalar
    }
}
