//! # Constants and type definitions for almagest
//!
//! This module centralizes the **astronomical constants**, **conversion factors**, and
//! **unit type aliases** shared by every formula in the crate.
//!
//! ## Overview
//!
//! - Reference epochs of the solar, lunar and sidereal theories (1900, J2000, 2010)
//! - Unit conversions (degrees ↔ radians ↔ hours, AU ↔ km)
//! - Rates used by the sidereal time and light-time corrections
//! - Type aliases documenting the unit carried by a plain `f64`

// -------------------------------------------------------------------------------------------------
// Angles and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → degrees
pub const ARCSEC: f64 = 1.0 / 3600.0;

/// Degrees of rotation per hour of angle
pub const DEGREES_PER_HOUR: f64 = 15.0;

// -------------------------------------------------------------------------------------------------
// Reference epochs (Julian Days)
// -------------------------------------------------------------------------------------------------

/// 1900 January 0.5, epoch of the solar and lunar series
pub const J1900: f64 = 2_415_020.0;

/// J2000.0, epoch of the sidereal time polynomial
pub const J2000: f64 = 2_451_545.0;

/// 2010 January 0.0, epoch of the approximate Sun and Moon
pub const EPOCH_2010: f64 = 2_455_196.5;

/// Last Julian-calendar day number before the Gregorian reform (1582 October 4)
pub const GREGORIAN_REFORM_JD: f64 = 2_299_160.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Length of the tropical year in days
pub const TROPICAL_YEAR: f64 = 365.242191;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in kilometres, as scaled by the 1900 solar theory
pub const AU: f64 = 149_598_500.0;

/// Earth equatorial radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6_378.14;

/// Earth equatorial radius in metres
pub const EARTH_RADIUS_M: f64 = 6_378_140.0;

/// Polar-to-equatorial axis ratio of the Earth (1 - flattening)
pub const EARTH_AXIS_RATIO: f64 = 0.996647;

/// Gaussian gravitational constant k
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// Light travel time for one AU, in days
pub const LIGHT_TIME_PER_AU: f64 = 0.0057755183;

/// Mean motion of a body at 1 AU (degrees/day), `k` expressed in degrees
pub const MEAN_MOTION_1AU: f64 = 0.9856076686;

/// Sidereal hours elapsed per solar hour
pub const SIDEREAL_RATE: f64 = 1.002737909;

/// Solar hours elapsed per sidereal hour
pub const SOLAR_RATE: f64 = 0.9972695663;

/// Sidereal drift across one UT day: a GST reached before this UT occurs twice that day
pub const SIDEREAL_AMBIGUITY_HOURS: f64 = 0.065574;

/// Constant of annual aberration, in degrees
pub const ABERRATION: f64 = 0.005694;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle or time of day in decimal hours
pub type Hours = f64;
/// Distance in kilometres
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
