pub use uom::si::f64::*;
pub use uom::si::{
    angle::{degree, radian},
    area::{square_centimeter, square_foot, square_meter, square_millimeter},
    force::{kilonewton, newton, pound_force},
    length::{centimeter, foot, meter, millimeter},
    pressure::{bar, kilopascal, pascal},
};
pub use uom::si::{angle, area, force, length, pressure};
use serde::{Deserialize, Serialize};
// Type aliases for domain clarity (zero cost)
pub type FrictionAngle = Angle;
pub type WallFrictionAngle = Angle;
pub type SurchargeForce = Force;
pub type WallPressure = Pressure;
pub type TributaryArea = Area;

// Common units for convenience
pub mod units {
    pub use uom::si::angle::{degree, radian};
    pub use uom::si::area::square_meter;
    pub use uom::si::force::{kilonewton, newton};
    pub use uom::si::length::{meter, millimeter};
    pub use uom::si::pressure::{kilopascal, pascal};
}

// Re-export nalgebra
pub use nalgebra as na;

// Standard units we use internally (just documentation)
/// Internal standard: meters
pub const INTERNAL_LENGTH_UNIT: &str = "meters";
/// Internal standard: newtons
pub const INTERNAL_FORCE_UNIT: &str = "newtons";
/// Internal standard: radians
pub const INTERNAL_ANGLE_UNIT: &str = "radians";

use std::{fmt, marker::PhantomData};
#[derive(Debug)]
pub struct DisplayForce(pub Force);
#[derive(Debug)]
pub struct DisplayAngle(pub Angle);
#[derive(Debug)]
pub struct DisplayLength(pub Length);
#[derive(Debug)]
pub struct DisplayArea(pub Area);
#[derive(Debug)]
pub struct DisplayWallPressure(pub Pressure);

impl fmt::Display for DisplayForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kn = self.0.get::<kilonewton>();
        let newtons = self.0.get::<newton>();
        write!(f, "{:.2} kN ({:.0} N)", kn, newtons)
    }
}

impl fmt::Display for DisplayAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0.get::<degree>())
    }
}

impl fmt::Display for DisplayLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0.get::<meter>();
        let mm = self.0.get::<millimeter>();
        write!(f, "{:.3} m ({:.0} mm)", m, mm)
    }
}

impl fmt::Display for DisplayArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m²", self.0.get::<square_meter>())
    }
}

impl fmt::Display for DisplayWallPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kpa = self.0.get::<kilopascal>();
        let pa = self.0.get::<pascal>();
        write!(f, "{:.2} kPa ({:.0} Pa)", kpa, pa)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WithUnit<T> {
    pub value: f64,
    pub unit: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

pub type LengthValue = WithUnit<Length>;
pub type AngleValue = WithUnit<Angle>;
pub type ForceValue = WithUnit<Force>;
pub type PressureValue = WithUnit<Pressure>;

impl<T> WithUnit<T> {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            _marker: PhantomData,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown length unit: {0}")]
    UnknownLengthUnit(String),

    #[error("Unknown angle unit: {0}")]
    UnknownAngleUnit(String),

    #[error("Unknown force unit: {0}")]
    UnknownForceUnit(String),

    #[error("Unknown pressure unit: {0}")]
    UnknownPressureUnit(String),
}

impl WithUnit<Length> {
    pub fn to_length(&self) -> Result<Length, UnitError> {
        match self.unit.as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Length::new::<meter>(self.value)),
            "cm" | "centimeter" | "centimeters" => Ok(Length::new::<centimeter>(self.value)),
            "mm" | "millimeter" | "millimeters" => Ok(Length::new::<millimeter>(self.value)),
            "ft" | "foot" | "feet" => Ok(Length::new::<foot>(self.value)),
            _ => Err(UnitError::UnknownLengthUnit(self.unit.clone())),
        }
    }

    pub fn from_length(length: Length, unit: &str) -> Result<Self, UnitError> {
        let value = match unit {
            "m" | "meter" | "meters" | "metre" | "metres" => length.get::<meter>(),
            "cm" | "centimeter" | "centimeters" => length.get::<centimeter>(),
            "mm" | "millimeter" | "millimeters" => length.get::<millimeter>(),
            "ft" | "foot" | "feet" => length.get::<foot>(),
            _ => return Err(UnitError::UnknownLengthUnit(unit.to_string())),
        };

        Ok(Self::new(value, unit))
    }
}

impl WithUnit<Angle> {
    pub fn to_angle(&self) -> Result<Angle, UnitError> {
        match self.unit.as_str() {
            "deg" | "degree" | "degrees" | "°" => Ok(Angle::new::<degree>(self.value)),
            "rad" | "radian" | "radians" => Ok(Angle::new::<radian>(self.value)),
            _ => Err(UnitError::UnknownAngleUnit(self.unit.clone())),
        }
    }

    pub fn from_angle(angle: Angle, unit: &str) -> Result<Self, UnitError> {
        let value = match unit {
            "deg" | "degree" | "degrees" | "°" => angle.get::<degree>(),
            "rad" | "radian" | "radians" => angle.get::<radian>(),
            _ => return Err(UnitError::UnknownAngleUnit(unit.to_string())),
        };

        Ok(Self::new(value, unit))
    }
}

impl WithUnit<Force> {
    pub fn to_force(&self) -> Result<Force, UnitError> {
        match self.unit.as_str() {
            "N" | "newton" | "newtons" => Ok(Force::new::<newton>(self.value)),
            "kN" | "kilonewton" | "kilonewtons" => Ok(Force::new::<kilonewton>(self.value)),
            "lbf" | "pound-force" => Ok(Force::new::<pound_force>(self.value)),
            _ => Err(UnitError::UnknownForceUnit(self.unit.clone())),
        }
    }

    pub fn from_force(force: Force, unit: &str) -> Result<Self, UnitError> {
        let value = match unit {
            "N" | "newton" | "newtons" => force.get::<newton>(),
            "kN" | "kilonewton" | "kilonewtons" => force.get::<kilonewton>(),
            "lbf" | "pound-force" => force.get::<pound_force>(),
            _ => return Err(UnitError::UnknownForceUnit(unit.to_string())),
        };

        Ok(Self::new(value, unit))
    }
}

impl WithUnit<Pressure> {
    pub fn to_pressure(&self) -> Result<Pressure, UnitError> {
        match self.unit.as_str() {
            "Pa" | "pascal" | "pascals" | "N/m²" | "N/m^2" => {
                Ok(Pressure::new::<pascal>(self.value))
            }
            "kPa" | "kilopascal" | "kilopascals" => Ok(Pressure::new::<kilopascal>(self.value)),
            "bar" => Ok(Pressure::new::<bar>(self.value)),
            _ => Err(UnitError::UnknownPressureUnit(self.unit.clone())),
        }
    }

    pub fn from_pressure(pressure: Pressure, unit: &str) -> Result<Self, UnitError> {
        let value = match unit {
            "Pa" | "pascal" | "pascals" | "N/m²" | "N/m^2" => pressure.get::<pascal>(),
            "kPa" | "kilopascal" | "kilopascals" => pressure.get::<kilopascal>(),
            "bar" => pressure.get::<bar>(),
            _ => return Err(UnitError::UnknownPressureUnit(unit.to_string())),
        };

        Ok(Self::new(value, unit))
    }
}

/// Convert UOM Length to internal coordinate (meters)
#[inline]
pub fn to_coord(length: Length) -> f64 {
    length.get::<meter>()
}

/// Convert internal coordinate (meters) to UOM Length
#[inline]
pub fn from_coord(value: f64) -> Length {
    Length::new::<meter>(value)
}

/// Create Point3 from UOM Lengths
pub fn point_from_lengths(x: Length, y: Length, z: Length) -> na::Point3<f64> {
    na::Point3::new(to_coord(x), to_coord(y), to_coord(z))
}

/// Extract X coordinate as Length
pub fn x_length(point: &na::Point3<f64>) -> Length {
    from_coord(point.x)
}

/// Extract Y coordinate as Length
pub fn y_length(point: &na::Point3<f64>) -> Length {
    from_coord(point.y)
}

pub fn z_length(point: &na::Point3<f64>) -> Length {
    from_coord(point.z)
}
