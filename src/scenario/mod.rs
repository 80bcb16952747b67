//! Scenario files: soil parameters, wall sampling and surcharge load cases
//! described in TOML with explicit unit strings.
//!
//! ```toml
//! [soil]
//! friction_angle = { value = 30.0, unit = "deg" }
//! wall_friction_angle = { value = 20.0, unit = "deg" }
//!
//! [wall]
//! origin = [4.0, 0.0, 0.0]
//! normal = [0.0, 1.0, 0.0]
//! width = { value = 8.0, unit = "m" }
//! height = { value = 4.0, unit = "m" }
//! spacing = { value = 1.0, unit = "m" }
//!
//! [[loads]]
//! name = "crane pad"
//! kind = "point"
//! points = [[0.0, 2.0, 3.0]]
//! force = { value = 100.0, unit = "kN" }
//! direction = [0.0, -1.0, 0.0]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::geometry::Plane;
use crate::surcharge::{
    HorizontalLoad, LoadGeometry, LocalFrame, SamplePoint, SurchargeAnalysis, SurchargeError,
    SurchargeResult,
};
use crate::types::*;

/// Error types for scenario handling
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unit error: {0}")]
    UnitError(#[from] UnitError),

    #[error("Invalid wall definition: {0}")]
    InvalidWall(String),

    #[error("Load '{name}': {reason}")]
    InvalidLoad { name: String, reason: String },

    #[error("Analysis failed for load '{name}': {source}")]
    Analysis {
        name: String,
        source: SurchargeError,
    },
}

/// A complete surcharge scenario: one wall, one soil, any number of loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurchargeScenario {
    pub soil: SoilParameters,
    pub wall: WallGrid,
    #[serde(default)]
    pub loads: Vec<LoadCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilParameters {
    /// Soil effective friction angle φ
    pub friction_angle: AngleValue,

    /// Wall-soil interface friction angle δ
    pub wall_friction_angle: AngleValue,
}

/// Uniform rectangular sampling of a wall face.
///
/// The grid extends from `origin` along the sample frame axes (`i`
/// horizontal in the face, `j` up), producing one sample per cell center
/// with the cell area as tributary area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallGrid {
    /// A corner of the sampled face (meters)
    pub origin: [f64; 3],

    /// Outward normal of the face
    pub normal: [f64; 3],

    pub width: LengthValue,
    pub height: LengthValue,
    pub spacing: LengthValue,
}

impl WallGrid {
    fn normal_vector(&self) -> na::Vector3<f64> {
        na::Vector3::new(self.normal[0], self.normal[1], self.normal[2])
    }

    fn origin_point(&self) -> na::Point3<f64> {
        na::Point3::new(self.origin[0], self.origin[1], self.origin[2])
    }

    pub fn plane(&self) -> Result<Plane, ScenarioError> {
        Plane::new(self.origin_point(), self.normal_vector())
            .ok_or_else(|| ScenarioError::InvalidWall("zero normal vector".into()))
    }

    pub fn frame(&self) -> Result<LocalFrame, ScenarioError> {
        LocalFrame::from_outward_normal(self.normal_vector())
            .ok_or_else(|| ScenarioError::InvalidWall("normal must not be vertical".into()))
    }

    /// Generate the sample points, ids starting at 1, row-major from the
    /// origin corner.
    pub fn samples(&self) -> Result<Vec<SamplePoint>, ScenarioError> {
        let frame = self.frame()?;
        let width = self.width.to_length()?.get::<meter>();
        let height = self.height.to_length()?.get::<meter>();
        let spacing = self.spacing.to_length()?.get::<meter>();

        if spacing <= 0.0 {
            return Err(ScenarioError::InvalidWall("spacing must be positive".into()));
        }
        let cols = ((width / spacing) + 1e-9).floor() as usize;
        let rows = ((height / spacing) + 1e-9).floor() as usize;
        if cols == 0 || rows == 0 {
            return Err(ScenarioError::InvalidWall(
                "face smaller than one grid cell".into(),
            ));
        }

        let origin = self.origin_point();
        let mut samples = Vec::with_capacity(rows * cols);
        let mut id = 0;
        for row in 0..rows {
            for col in 0..cols {
                id += 1;
                let position = origin
                    + frame.i * ((col as f64 + 0.5) * spacing)
                    + frame.j * ((row as f64 + 0.5) * spacing);
                samples.push(SamplePoint {
                    id,
                    position,
                    tributary_area: spacing * spacing,
                    frame,
                });
            }
        }
        Ok(samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    Point,
    Line,
    Area,
}

/// One surcharge load case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCase {
    pub name: String,
    pub kind: LoadKind,

    /// Feature points (meters): 1 for point, 2 for line, ≥ 3 for area
    pub points: Vec<[f64; 3]>,

    pub force: ForceValue,

    /// Load direction in the global frame, scaled by `force`
    pub direction: [f64; 3],
}

impl LoadCase {
    fn point(&self, index: usize) -> na::Point3<f64> {
        let p = self.points[index];
        na::Point3::new(p[0], p[1], p[2])
    }

    fn invalid(&self, reason: impl Into<String>) -> ScenarioError {
        ScenarioError::InvalidLoad {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }

    pub fn to_load(&self) -> Result<HorizontalLoad, ScenarioError> {
        let geometry = match self.kind {
            LoadKind::Point => {
                if self.points.len() != 1 {
                    return Err(self.invalid("point load needs exactly 1 feature point"));
                }
                LoadGeometry::Point(self.point(0))
            }
            LoadKind::Line => {
                if self.points.len() != 2 {
                    return Err(self.invalid("line load needs exactly 2 feature points"));
                }
                LoadGeometry::Line {
                    a: self.point(0),
                    b: self.point(1),
                }
            }
            LoadKind::Area => {
                if self.points.len() < 3 {
                    return Err(self.invalid("area load needs at least 3 feature points"));
                }
                LoadGeometry::Area((0..self.points.len()).map(|i| self.point(i)).collect())
            }
        };

        let direction = na::Vector3::new(self.direction[0], self.direction[1], self.direction[2]);
        let magnitude = self.force.to_force()?;
        HorizontalLoad::from_magnitude(geometry, magnitude, direction)
            .ok_or_else(|| self.invalid("zero direction vector"))
    }
}

impl SurchargeScenario {
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Load every `.toml` scenario in a directory; unreadable files are
    /// skipped with a warning.
    pub fn load_all_from_directory(
        path: impl AsRef<Path>,
    ) -> Result<Vec<(PathBuf, SurchargeScenario)>, ScenarioError> {
        let mut scenarios = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }
            match Self::from_file(&path) {
                Ok(scenario) => scenarios.push((path, scenario)),
                Err(e) => log::warn!("skipped scenario {}: {}", path.display(), e),
            }
        }
        Ok(scenarios)
    }

    /// Check every unit string and load definition without running any
    /// geometry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.soil.friction_angle.to_angle() {
            errors.push(format!("Soil friction angle: {}", e));
        }
        if let Err(e) = self.soil.wall_friction_angle.to_angle() {
            errors.push(format!("Wall friction angle: {}", e));
        }

        for field in [
            ("width", &self.wall.width),
            ("height", &self.wall.height),
            ("spacing", &self.wall.spacing),
        ] {
            if let Err(e) = field.1.to_length() {
                errors.push(format!("Wall {}: {}", field.0, e));
            }
        }

        for load in &self.loads {
            if let Err(e) = load.force.to_force() {
                errors.push(format!("Load '{}': {}", load.name, e));
            }
            if let Err(e) = load.to_load() {
                errors.push(e.to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Run every load case against the wall, in file order.
    pub fn run(&self) -> Result<Vec<(String, SurchargeResult)>, ScenarioError> {
        let plane = self.wall.plane()?;
        let samples = self.wall.samples()?;
        let phi = self.soil.friction_angle.to_angle()?;
        let delta = self.soil.wall_friction_angle.to_angle()?;

        let mut results = Vec::with_capacity(self.loads.len());
        for case in &self.loads {
            let load = case.to_load()?;
            let mut analysis = SurchargeAnalysis::new(load, plane, phi, delta);
            analysis.add_samples(samples.iter().cloned());
            let result = analysis
                .calculate_pressures()
                .map_err(|source| ScenarioError::Analysis {
                    name: case.name.clone(),
                    source,
                })?;
            results.push((case.name.clone(), result));
        }
        Ok(results)
    }
}
