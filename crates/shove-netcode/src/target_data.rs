//! Push target data and its wire format
//!
//! A push travels as up to two segments, always in this order:
//!
//! ```text
//! segment 0 (required)  direction: 3 x i16 quantized normal
//!                       distance:  f32
//!                       strength:  f32
//! segment 1 (optional)  strength:  f32
//!                       override:  bool
//! ```
//!
//! Segments are bincode-encoded back to back. A receiver that only gets
//! segment 0 falls back to a strength scalar of 1 with no override.

use crate::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shove_core::math::{safe_normal, safe_normal_2d};

/// Scale applied to each normal component before rounding to `i16`
const NORMAL_SCALE: f32 = i16::MAX as f32;

/// Largest per-component error introduced by normal quantization
pub const NORMAL_QUANTIZATION_TOLERANCE: f32 = 1.0 / NORMAL_SCALE;

/// Unit vector packed into 16 bits per component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizedNormal([i16; 3]);

impl QuantizedNormal {
    pub fn quantize(v: Vec3) -> Self {
        let pack = |c: f32| (c.clamp(-1.0, 1.0) * NORMAL_SCALE).round() as i16;
        Self([pack(v.x), pack(v.y), pack(v.z)])
    }

    pub fn dequantize(&self) -> Vec3 {
        let [x, y, z] = self.0;
        Vec3::new(x as f32, y as f32, z as f32) / NORMAL_SCALE
    }
}

/// Segment 0: direction, distance and strength of a push
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "DirectionWire", into = "DirectionWire")]
pub struct PushDirectionData {
    pub direction: Vec3,
    pub distance: f32,
    pub strength_scalar: f32,
}

#[derive(Serialize, Deserialize)]
struct DirectionWire {
    direction: QuantizedNormal,
    distance: f32,
    strength_scalar: f32,
}

impl From<PushDirectionData> for DirectionWire {
    fn from(data: PushDirectionData) -> Self {
        Self {
            direction: QuantizedNormal::quantize(data.direction),
            distance: data.distance,
            strength_scalar: data.strength_scalar,
        }
    }
}

impl From<DirectionWire> for PushDirectionData {
    fn from(wire: DirectionWire) -> Self {
        Self {
            direction: wire.direction.dequantize(),
            distance: wire.distance,
            strength_scalar: wire.strength_scalar,
        }
    }
}

/// Segment 1: strength scalar and whether it overrides the curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushStrengthData {
    pub strength_scalar: f32,
    pub override_strength: bool,
}

impl Default for PushStrengthData {
    fn default() -> Self {
        Self {
            strength_scalar: 1.0,
            override_strength: false,
        }
    }
}

/// One entry of a target data handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetData {
    Direction(PushDirectionData),
    Strength(PushStrengthData),
}

/// The complete description of a push
///
/// Every constructor leaves a unit or zero direction and a finite distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushTargetData {
    direction: Vec3,
    distance: f32,
    strength_scalar: f32,
    override_strength: bool,
}

impl PushTargetData {
    /// Build push data, normalizing the direction
    ///
    /// Non-finite directions and distances are stored as 0.
    pub fn new(direction: Vec3, distance: f32, strength_scalar: f32, override_strength: bool) -> Self {
        let direction = if direction.is_finite() {
            safe_normal(direction)
        } else {
            Vec3::ZERO
        };
        Self {
            direction,
            distance: if distance.is_finite() { distance } else { 0.0 },
            strength_scalar,
            override_strength,
        }
    }

    /// Push data for a pusher at `pusher_location` and a pushee at
    /// `pushee_location`, pointing from pushee to pusher
    pub fn between(
        pushee_location: Vec3,
        pusher_location: Vec3,
        strength_scalar: f32,
        override_strength: bool,
    ) -> Self {
        let delta = pusher_location - pushee_location;
        Self::new(delta, delta.length(), strength_scalar, override_strength)
    }

    /// Split into handle entries, primary segment first
    pub fn to_segments(&self) -> [TargetData; 2] {
        [
            TargetData::Direction(PushDirectionData {
                direction: self.direction,
                distance: self.distance,
                strength_scalar: self.strength_scalar,
            }),
            TargetData::Strength(PushStrengthData {
                strength_scalar: self.strength_scalar,
                override_strength: self.override_strength,
            }),
        ]
    }

    /// Reassemble from handle entries
    ///
    /// Returns `None` if the first entry is not a direction segment. A
    /// missing strength segment uses [`PushStrengthData::default`]. The
    /// direction is re-normalized, planar when `force_2d` is set.
    pub fn from_segments(segments: &[TargetData], force_2d: bool) -> Option<Self> {
        let primary = match segments.first()? {
            TargetData::Direction(primary) => primary,
            TargetData::Strength(_) => return None,
        };

        let strength = match segments.get(1) {
            Some(TargetData::Strength(strength)) => *strength,
            _ => PushStrengthData::default(),
        };

        let direction = if force_2d {
            safe_normal_2d(primary.direction)
        } else {
            primary.direction
        };

        Some(Self::new(
            direction,
            primary.distance,
            strength.strength_scalar,
            strength.override_strength,
        ))
    }

    /// Unit direction of the push, or zero
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Distance between pushee and pusher
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn strength_scalar(&self) -> f32 {
        self.strength_scalar
    }

    pub fn override_strength(&self) -> bool {
        self.override_strength
    }

    /// Encode both segments
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_segments(&self.to_segments())
    }

    /// Encode only the primary segment
    pub fn encode_primary(&self) -> Result<Vec<u8>> {
        encode_segments(&self.to_segments()[..1])
    }

    /// Decode from bytes produced by [`encode`](Self::encode) or
    /// [`encode_primary`](Self::encode_primary)
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let segments = decode_segments(bytes)?;
        Self::from_segments(&segments, false).ok_or(Error::MissingPrimarySegment)
    }
}

/// Write handle entries in order
///
/// Only a direction segment followed by an optional strength segment is a
/// valid layout.
pub fn encode_segments(segments: &[TargetData]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(24);
    match segments {
        [TargetData::Direction(primary)] => {
            bincode::serialize_into(&mut bytes, primary)?;
        }
        [TargetData::Direction(primary), TargetData::Strength(strength)] => {
            bincode::serialize_into(&mut bytes, primary)?;
            bincode::serialize_into(&mut bytes, strength)?;
        }
        _ => return Err(Error::InvalidLayout(segments.len())),
    }
    Ok(bytes)
}

/// Read handle entries, tolerating an absent strength segment
pub fn decode_segments(bytes: &[u8]) -> Result<Vec<TargetData>> {
    let mut reader = bytes;
    let primary: PushDirectionData = bincode::deserialize_from(&mut reader)?;
    let mut segments = vec![TargetData::Direction(primary)];

    if !reader.is_empty() {
        let strength: PushStrengthData = bincode::deserialize_from(&mut reader)?;
        segments.push(TargetData::Strength(strength));
    }

    if !reader.is_empty() {
        return Err(Error::TrailingBytes(reader.len()));
    }
    Ok(segments)
}
