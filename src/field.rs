//! Procedural spiral-galaxy particle field.
//!
//! The generator places particles along `branches` spiral arms. Each particle
//! gets a radius drawn uniformly from `[0, radius)`, is twisted by
//! `radius * spin`, and is jittered per axis by a power-biased random offset
//! that grows with distance from the core. Colors follow a radial gradient from
//! `inner_color` at the center to `outer_color` at the rim.
//!
//! # Example
//!
//! ```ignore
//! use gesture_galaxy::field::{FieldGenerator, GalaxyParams};
//!
//! let field = FieldGenerator::new(GalaxyParams::default()).generate(85_000)?;
//! assert_eq!(field.len(), 85_000);
//! ```
//!
//! Generation is not seeded by default. Use
//! [`FieldGenerator::generate_with_rng`] with a seeded [`rand::rngs::SmallRng`]
//! when a reproducible distribution is needed.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vertical flattening applied to the y offset so the disk stays thin.
pub const VERTICAL_FLATTENING: f32 = 0.35;

/// Default number of particles in a field.
pub const DEFAULT_PARTICLE_COUNT: u32 = 85_000;

/// Shape and palette of a spiral galaxy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalaxyParams {
    /// Outer radius of the disk.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Twist per unit of radius, in radians.
    pub spin: f32,
    /// Jitter scale, relative to a particle's radius.
    pub randomness: f32,
    /// Exponent applied to the jitter magnitude. Higher values pull more
    /// particles onto the arm center line.
    pub randomness_power: f32,
    /// RGB color at the core.
    pub inner_color: [f32; 3],
    /// RGB color at the rim.
    pub outer_color: [f32; 3],
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            radius: 30.0,
            branches: 4,
            spin: 0.15,
            randomness: 0.25,
            randomness_power: 3.0,
            inner_color: [1.0, 0.376, 0.188],
            outer_color: [0.106, 0.224, 0.518],
        }
    }
}

impl GalaxyParams {
    /// Check the parameters before any particle is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if self.branches == 0 {
            return Err(ConfigError::NoBranches);
        }
        if !self.spin.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "spin",
                value: self.spin,
            });
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(ConfigError::InvalidRandomness(self.randomness));
        }
        if !(self.randomness_power.is_finite() && self.randomness_power > 0.0) {
            return Err(ConfigError::InvalidRandomnessPower(self.randomness_power));
        }
        for color in [self.inner_color, self.outer_color] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::InvalidColor(color));
            }
        }
        Ok(())
    }

    /// Angle of the arm a particle index is assigned to.
    #[inline]
    pub fn branch_angle(&self, index: u32) -> f32 {
        (index % self.branches) as f32 / self.branches as f32 * TAU
    }
}

/// GPU vertex layout for one particle.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Generated particles, stored as two parallel sequences.
///
/// Immutable once generated; the renderer only reads it.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    branches: u32,
}

impl ParticleField {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Arm index the particle at `index` was assigned to.
    #[inline]
    pub fn branch_of(&self, index: usize) -> u32 {
        index as u32 % self.branches
    }

    /// Largest distance from the origin in the disk plane, ignoring height.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| (p.x * p.x + p.z * p.z).sqrt())
            .fold(0.0, f32::max)
    }

    /// Interleave positions and colors for upload.
    pub fn to_vertices(&self) -> Vec<ParticleVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(p, c)| ParticleVertex {
                position: p.to_array(),
                color: c.to_array(),
            })
            .collect()
    }
}

/// Builds [`ParticleField`]s from validated [`GalaxyParams`].
#[derive(Clone, Debug)]
pub struct FieldGenerator {
    params: GalaxyParams,
}

impl FieldGenerator {
    pub fn new(params: GalaxyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    /// Generate `count` particles from an entropy-seeded RNG.
    pub fn generate(&self, count: u32) -> Result<ParticleField, ConfigError> {
        self.generate_with_rng(count, &mut SmallRng::from_entropy())
    }

    /// Generate `count` particles drawing every random value from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        count: u32,
        rng: &mut R,
    ) -> Result<ParticleField, ConfigError> {
        self.params.validate()?;
        if count == 0 {
            return Err(ConfigError::EmptyField);
        }

        let p = &self.params;
        let inner = Vec3::from_array(p.inner_color);
        let outer = Vec3::from_array(p.outer_color);

        let mut positions = Vec::with_capacity(count as usize);
        let mut colors = Vec::with_capacity(count as usize);

        for i in 0..count {
            let r = rng.gen_range(0.0..p.radius);
            let angle = p.branch_angle(i) + r * p.spin;

            let offset = Vec3::new(
                jitter(rng, p.randomness_power),
                jitter(rng, p.randomness_power),
                jitter(rng, p.randomness_power),
            ) * (p.randomness * r);

            positions.push(Vec3::new(
                angle.cos() * r + offset.x,
                offset.y * VERTICAL_FLATTENING,
                angle.sin() * r + offset.z,
            ));

            let t = (r / p.radius).clamp(0.0, 1.0);
            colors.push(inner.lerp(outer, t).clamp(Vec3::ZERO, Vec3::ONE));
        }

        log::debug!(
            "generated {} particles across {} branches (radius {})",
            count,
            p.branches,
            p.radius
        );

        Ok(ParticleField {
            positions,
            colors,
            branches: p.branches,
        })
    }
}

/// Signed offset in `(-1, 1)` whose magnitude is biased toward zero by `power`.
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(power);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_generate_exact_count() {
        let field = FieldGenerator::new(GalaxyParams::default())
            .generate_with_rng(1234, &mut seeded())
            .unwrap();
        assert_eq!(field.len(), 1234);
        assert_eq!(field.positions().len(), field.colors().len());
    }

    #[test]
    fn test_colors_in_unit_range() {
        let field = FieldGenerator::new(GalaxyParams::default())
            .generate_with_rng(5000, &mut seeded())
            .unwrap();
        for c in field.colors() {
            for v in c.to_array() {
                assert!((0.0..=1.0).contains(&v), "component {} out of range", v);
            }
        }
    }

    #[test]
    fn test_planar_distance_bounded() {
        let params = GalaxyParams {
            randomness: 0.5,
            randomness_power: 1.0,
            ..Default::default()
        };
        let field = FieldGenerator::new(params.clone())
            .generate_with_rng(20_000, &mut seeded())
            .unwrap();
        // x and z are jittered independently, so the planar offset can reach
        // sqrt(2) * randomness * r.
        let limit = params.radius * (1.0 + std::f32::consts::SQRT_2 * params.randomness) + 1e-3;
        assert!(field.bounding_radius() <= limit);
    }

    #[test]
    fn test_zero_randomness_stays_on_arm() {
        let params = GalaxyParams {
            randomness: 0.0,
            ..Default::default()
        };
        let field = FieldGenerator::new(params.clone())
            .generate_with_rng(2000, &mut seeded())
            .unwrap();
        for p in field.positions() {
            assert_eq!(p.y, 0.0);
            assert!((p.x * p.x + p.z * p.z).sqrt() < params.radius + 1e-3);
        }
    }

    #[test]
    fn test_branch_assignment_uniform() {
        let params = GalaxyParams {
            branches: 5,
            spin: 0.0,
            randomness: 0.0,
            ..Default::default()
        };
        let field = FieldGenerator::new(params.clone())
            .generate_with_rng(100, &mut seeded())
            .unwrap();

        let mut buckets = [0u32; 5];
        for i in 0..field.len() {
            buckets[field.branch_of(i) as usize] += 1;
        }
        assert_eq!(buckets, [20; 5]);

        // With no spin and no jitter every particle sits on its arm's ray.
        for (i, p) in field.positions().iter().enumerate() {
            if p.length() < 1e-3 {
                continue;
            }
            let expected = params.branch_angle(i as u32);
            let dir = Vec3::new(expected.cos(), 0.0, expected.sin());
            assert!(p.normalize().dot(dir) > 0.999);
        }
    }

    #[test]
    fn test_color_gradient_follows_radius() {
        let params = GalaxyParams {
            randomness: 0.0,
            inner_color: [1.0, 0.0, 0.0],
            outer_color: [0.0, 0.0, 1.0],
            ..Default::default()
        };
        let field = FieldGenerator::new(params.clone())
            .generate_with_rng(500, &mut seeded())
            .unwrap();
        for (p, c) in field.positions().iter().zip(field.colors()) {
            let t = p.length() / params.radius;
            assert!((c.z - t).abs() < 1e-3);
            assert!((c.x - (1.0 - t)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let build = |params: GalaxyParams| FieldGenerator::new(params).generate_with_rng(10, &mut seeded());

        assert_eq!(
            build(GalaxyParams { radius: 0.0, ..Default::default() }).unwrap_err(),
            ConfigError::InvalidRadius(0.0)
        );
        assert_eq!(
            build(GalaxyParams { branches: 0, ..Default::default() }).unwrap_err(),
            ConfigError::NoBranches
        );
        assert!(matches!(
            build(GalaxyParams { randomness_power: 0.0, ..Default::default() }),
            Err(ConfigError::InvalidRandomnessPower(_))
        ));
        for spin in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                build(GalaxyParams { spin, ..Default::default() }),
                Err(ConfigError::NonFinite { field: "spin", .. })
            ));
        }
        assert_eq!(
            FieldGenerator::new(GalaxyParams::default())
                .generate_with_rng(0, &mut seeded())
                .unwrap_err(),
            ConfigError::EmptyField
        );
    }

    #[test]
    fn test_same_seed_same_field() {
        let generator = FieldGenerator::new(GalaxyParams::default());
        let a = generator.generate_with_rng(256, &mut seeded()).unwrap();
        let b = generator.generate_with_rng(256, &mut seeded()).unwrap();
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_vertices_interleave() {
        let field = FieldGenerator::new(GalaxyParams::default())
            .generate_with_rng(3, &mut seeded())
            .unwrap();
        let verts = field.to_vertices();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, field.positions()[1].to_array());
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 24);
    }
}
