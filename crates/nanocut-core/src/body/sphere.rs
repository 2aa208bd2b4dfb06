use nalgebra::Vector3;
use nanocut_geometry::section::parse_section;
use nanocut_geometry::{ConfigError, CoordSys, Cuboid, Geometry, Section};
use serde::Deserialize;

use super::TOLERANCE;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SphereSection {
    radius: f64,
    #[serde(default)]
    center: [f64; 3],
    #[serde(default)]
    center_coordsys: CoordSys,
}

/// A ball `‖p − c‖ ≤ r`.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vector3<f64>,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Vector3<f64>, radius: f64) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::invalid(
                "sphere",
                format!("radius must be positive, got {}", radius),
            ));
        }
        Ok(Self { center, radius })
    }

    pub fn from_section(
        geometry: &Geometry,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: SphereSection = parse_section(name, section)?;
        let center = geometry.to_cartesian(Vector3::from(raw.center), raw.center_coordsys);
        Self::new(center, raw.radius).map_err(|e| rename(e, name))
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        let r = Vector3::repeat(self.radius + TOLERANCE);
        Cuboid::new(self.center - r, self.center + r)
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let r = self.radius + TOLERANCE;
        (point - self.center).norm_squared() <= r * r
    }
}

/// Attach the real section name to a validation error raised by `new`.
pub(super) fn rename(err: ConfigError, name: &str) -> ConfigError {
    match err {
        ConfigError::InvalidSection { message, .. } => ConfigError::invalid(name, message),
        other => other,
    }
}
