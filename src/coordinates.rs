//! # Coordinate systems and their transforms
//!
//! This module defines the celestial and terrestrial coordinate value types and the
//! conversions between them:
//!
//! - hour angle ↔ horizon (altitude/azimuth) for an observer latitude,
//! - right ascension ↔ hour angle through the local sidereal time,
//! - ecliptic ↔ equatorial, as a rotation about the equinox axis by the obliquity,
//! - equatorial ↔ galactic,
//! - angular separation between two equatorial positions,
//! - atmospheric refraction (true ↔ apparent altitude),
//! - geocentric → topocentric parallax in hour angle and declination.
//!
//! Angular values are stored in degrees, except right ascension and hour angle which are
//! stored in hours, matching the conventions of the formula set.
use std::ops::ControlFlow;

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::almagest_errors::{ensure_finite, AlmagestError};
use crate::angle::{wrap_deg, wrap_hours, wrap_rad};
use crate::constants::{
    Degree, Hours, Kilometer, DEGREES_PER_HOUR, EARTH_AXIS_RATIO, EARTH_RADIUS_KM,
    EARTH_RADIUS_M, RADEG,
};
use crate::earth_orientation::true_obliquity;
use crate::iteration::{bounded_loop, SolverParams};
use crate::time::{gst_to_lst, ut_to_gst, DatedTime, JulianDay};

fn check_latitude(value: Degree, what: &'static str) -> Result<Degree, AlmagestError> {
    ensure_finite(value, what)?;
    if value.abs() > 90.0 {
        return Err(AlmagestError::OutOfDomain(format!(
            "{what} {value} outside [-90, 90]"
        )));
    }
    Ok(value)
}

// -------------------------------------------------------------------------------------------------
// Value types
// -------------------------------------------------------------------------------------------------

/// Right ascension (hours) and declination (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    pub right_ascension: Hours,
    pub declination: Degree,
}

impl EquatorialCoordinate {
    /// Right ascension is wound into `[0, 24)`; declination must lie in `[-90, 90]`.
    pub fn new(right_ascension: Hours, declination: Degree) -> Result<Self, AlmagestError> {
        ensure_finite(right_ascension, "right ascension")?;
        check_latitude(declination, "declination")?;
        Ok(EquatorialCoordinate {
            right_ascension: wrap_hours(right_ascension),
            declination,
        })
    }
}

/// Hour angle (hours) and declination (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourAngleCoordinate {
    pub hour_angle: Hours,
    pub declination: Degree,
}

impl HourAngleCoordinate {
    pub fn new(hour_angle: Hours, declination: Degree) -> Result<Self, AlmagestError> {
        ensure_finite(hour_angle, "hour angle")?;
        check_latitude(declination, "declination")?;
        Ok(HourAngleCoordinate {
            hour_angle: wrap_hours(hour_angle),
            declination,
        })
    }
}

/// Altitude above the horizon and azimuth measured from north through east, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    pub altitude: Degree,
    pub azimuth: Degree,
}

impl HorizontalCoordinate {
    pub fn new(altitude: Degree, azimuth: Degree) -> Result<Self, AlmagestError> {
        check_latitude(altitude, "altitude")?;
        ensure_finite(azimuth, "azimuth")?;
        Ok(HorizontalCoordinate {
            altitude,
            azimuth: wrap_deg(azimuth),
        })
    }
}

/// Ecliptic longitude and latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticCoordinate {
    pub longitude: Degree,
    pub latitude: Degree,
}

impl EclipticCoordinate {
    pub fn new(longitude: Degree, latitude: Degree) -> Result<Self, AlmagestError> {
        ensure_finite(longitude, "ecliptic longitude")?;
        check_latitude(latitude, "ecliptic latitude")?;
        Ok(EclipticCoordinate {
            longitude: wrap_deg(longitude),
            latitude,
        })
    }
}

/// Galactic longitude and latitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalacticCoordinate {
    pub longitude: Degree,
    pub latitude: Degree,
}

impl GalacticCoordinate {
    pub fn new(longitude: Degree, latitude: Degree) -> Result<Self, AlmagestError> {
        ensure_finite(longitude, "galactic longitude")?;
        check_latitude(latitude, "galactic latitude")?;
        Ok(GalacticCoordinate {
            longitude: wrap_deg(longitude),
            latitude,
        })
    }
}

/// Observer position on the Earth.
///
/// Longitudes are positive east of Greenwich; the elevation above sea level is in metres
/// and only enters the parallax correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    pub latitude: Degree,
    pub longitude: Degree,
    pub elevation_m: f64,
}

impl GeographicLocation {
    /// Errors
    /// ------
    /// * `NonFiniteInput` for NaN or infinite components.
    /// * `InvalidLocation` for a latitude outside `[-90, 90]` or a longitude outside
    ///   `[-180, 180]`.
    pub fn new(latitude: Degree, longitude: Degree) -> Result<Self, AlmagestError> {
        ensure_finite(latitude, "latitude")?;
        ensure_finite(longitude, "longitude")?;
        if latitude.abs() > 90.0 {
            return Err(AlmagestError::InvalidLocation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if longitude.abs() > 180.0 {
            return Err(AlmagestError::InvalidLocation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(GeographicLocation {
            latitude,
            longitude,
            elevation_m: 0.0,
        })
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Result<Self, AlmagestError> {
        self.elevation_m = ensure_finite(elevation_m, "elevation")?;
        Ok(self)
    }

    /// `(ρ sin φ', ρ cos φ')`: the observer's distance from the Earth's axis and from the
    /// equatorial plane, in equatorial radii.
    pub fn geocentric_terms(&self) -> (f64, f64) {
        let phi = self.latitude * RADEG;
        let u = (EARTH_AXIS_RATIO * phi.tan()).atan();
        let h = self.elevation_m / EARTH_RADIUS_M;
        let rho_sin = EARTH_AXIS_RATIO * u.sin() + h * phi.sin();
        let rho_cos = u.cos() + h * phi.cos();
        (rho_sin, rho_cos)
    }
}

// -------------------------------------------------------------------------------------------------
// Cartesian helpers
// -------------------------------------------------------------------------------------------------

/// Unit vector pointing at (`lon`, `lat`), both in degrees.
pub(crate) fn unit_vector(lon: Degree, lat: Degree) -> Vector3<f64> {
    let (sl, cl) = (lon * RADEG).sin_cos();
    let (sb, cb) = (lat * RADEG).sin_cos();
    Vector3::new(cb * cl, cb * sl, sb)
}

/// Longitude in `[0, 360)` and latitude in `[-90, 90]` of a (non-zero) vector, in degrees.
pub(crate) fn spherical_angles(v: &Vector3<f64>) -> (Degree, Degree) {
    let lon = wrap_rad(v.y.atan2(v.x)) / RADEG;
    let lat = v.z.atan2(v.x.hypot(v.y)) / RADEG;
    (wrap_deg(lon), lat)
}

/// Active rotation about the x axis (the equinox direction) by `angle` degrees.
fn rotation_about_equinox(angle: Degree) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle * RADEG)
}

// -------------------------------------------------------------------------------------------------
// Horizon
// -------------------------------------------------------------------------------------------------

/// Hour angle and declination → altitude and azimuth.
///
/// Arguments
/// ---------
/// * `position`: hour angle (hours) and declination (degrees).
/// * `latitude`: observer latitude in degrees.
///
/// Return
/// ------
/// * Altitude in `[-90, 90]` and azimuth in `[0, 360)`, measured from north through east.
///
/// See also
/// --------
/// * [`horizontal_to_hour_angle`] – the inverse transform.
pub fn hour_angle_to_horizontal(
    position: &HourAngleCoordinate,
    latitude: Degree,
) -> Result<HorizontalCoordinate, AlmagestError> {
    check_latitude(latitude, "latitude")?;
    let h = position.hour_angle * DEGREES_PER_HOUR * RADEG;
    let (sd, cd) = (position.declination * RADEG).sin_cos();
    let (sp, cp) = (latitude * RADEG).sin_cos();

    let sin_alt = (sd * sp + cd * cp * h.cos()).clamp(-1.0, 1.0);
    let y = -cd * cp * h.sin();
    let x = sd - sp * sin_alt;

    Ok(HorizontalCoordinate {
        altitude: sin_alt.asin() / RADEG,
        azimuth: wrap_deg(y.atan2(x) / RADEG),
    })
}

/// Altitude and azimuth → hour angle and declination.
pub fn horizontal_to_hour_angle(
    position: &HorizontalCoordinate,
    latitude: Degree,
) -> Result<HourAngleCoordinate, AlmagestError> {
    check_latitude(latitude, "latitude")?;
    let az = position.azimuth * RADEG;
    let (sa, ca) = (position.altitude * RADEG).sin_cos();
    let (sp, cp) = (latitude * RADEG).sin_cos();

    let sin_dec = (sa * sp + ca * cp * az.cos()).clamp(-1.0, 1.0);
    let y = -ca * cp * az.sin();
    let x = sa - sp * sin_dec;

    Ok(HourAngleCoordinate {
        hour_angle: wrap_hours(y.atan2(x) / RADEG / DEGREES_PER_HOUR),
        declination: sin_dec.asin() / RADEG,
    })
}

/// Local sidereal time at universal time `ut` for an observer at `location`.
pub fn local_sidereal_time(ut: &DatedTime, location: &GeographicLocation) -> Result<Hours, AlmagestError> {
    gst_to_lst(ut_to_gst(ut), location.longitude)
}

/// Right ascension → hour angle at universal time `ut`.
pub fn right_ascension_to_hour_angle(
    right_ascension: Hours,
    ut: &DatedTime,
    location: &GeographicLocation,
) -> Result<Hours, AlmagestError> {
    ensure_finite(right_ascension, "right ascension")?;
    Ok(wrap_hours(local_sidereal_time(ut, location)? - right_ascension))
}

/// Hour angle → right ascension at universal time `ut`.
pub fn hour_angle_to_right_ascension(
    hour_angle: Hours,
    ut: &DatedTime,
    location: &GeographicLocation,
) -> Result<Hours, AlmagestError> {
    ensure_finite(hour_angle, "hour angle")?;
    Ok(wrap_hours(local_sidereal_time(ut, location)? - hour_angle))
}

/// Equatorial position → altitude and azimuth for `location` at universal time `ut`.
pub fn equatorial_to_horizontal(
    position: &EquatorialCoordinate,
    ut: &DatedTime,
    location: &GeographicLocation,
) -> Result<HorizontalCoordinate, AlmagestError> {
    let ha = right_ascension_to_hour_angle(position.right_ascension, ut, location)?;
    hour_angle_to_horizontal(
        &HourAngleCoordinate {
            hour_angle: ha,
            declination: position.declination,
        },
        location.latitude,
    )
}

/// Altitude and azimuth for `location` at universal time `ut` → equatorial position.
pub fn horizontal_to_equatorial(
    position: &HorizontalCoordinate,
    ut: &DatedTime,
    location: &GeographicLocation,
) -> Result<EquatorialCoordinate, AlmagestError> {
    let ha = horizontal_to_hour_angle(position, location.latitude)?;
    let lst = local_sidereal_time(ut, location)?;
    Ok(EquatorialCoordinate {
        right_ascension: wrap_hours(lst - ha.hour_angle),
        declination: ha.declination,
    })
}

// -------------------------------------------------------------------------------------------------
// Ecliptic and galactic frames
// -------------------------------------------------------------------------------------------------

/// Ecliptic → equatorial for a given obliquity (degrees).
///
/// The equatorial frame is the ecliptic frame rotated about the equinox direction by the
/// obliquity ε:
///
/// ```text
/// x_eq = x
/// y_eq = y·cos ε − z·sin ε
/// z_eq = y·sin ε + z·cos ε
/// ```
pub fn ecliptic_to_equatorial(
    position: &EclipticCoordinate,
    obliquity: Degree,
) -> EquatorialCoordinate {
    let v = rotation_about_equinox(obliquity) * unit_vector(position.longitude, position.latitude);
    let (ra, dec) = spherical_angles(&v);
    EquatorialCoordinate {
        right_ascension: wrap_hours(ra / DEGREES_PER_HOUR),
        declination: dec,
    }
}

/// Equatorial → ecliptic for a given obliquity (degrees).
pub fn equatorial_to_ecliptic(
    position: &EquatorialCoordinate,
    obliquity: Degree,
) -> EclipticCoordinate {
    let v = rotation_about_equinox(-obliquity)
        * unit_vector(
            position.right_ascension * DEGREES_PER_HOUR,
            position.declination,
        );
    let (longitude, latitude) = spherical_angles(&v);
    EclipticCoordinate {
        longitude,
        latitude,
    }
}

/// Ecliptic → equatorial using the true obliquity on the date of `jd`.
pub fn ecliptic_to_equatorial_at(position: &EclipticCoordinate, jd: JulianDay) -> EquatorialCoordinate {
    ecliptic_to_equatorial(position, true_obliquity(jd.midnight()))
}

/// Right ascension of the north galactic pole (degrees, B1950)
const GALACTIC_POLE_RA: Degree = 192.25;
/// Declination of the north galactic pole (degrees, B1950)
const GALACTIC_POLE_DEC: Degree = 27.4;
/// Galactic longitude of the ascending node of the galactic plane
const GALACTIC_NODE: Degree = 33.0;

/// Equatorial → galactic coordinates.
pub fn equatorial_to_galactic(position: &EquatorialCoordinate) -> GalacticCoordinate {
    let a = (position.right_ascension * DEGREES_PER_HOUR - GALACTIC_POLE_RA) * RADEG;
    let (sd, cd) = (position.declination * RADEG).sin_cos();
    let (sp, cp) = (GALACTIC_POLE_DEC * RADEG).sin_cos();

    let sin_b = (cd * cp * a.cos() + sd * sp).clamp(-1.0, 1.0);
    let y = sd - sin_b * sp;
    let x = cd * a.sin() * cp;

    GalacticCoordinate {
        longitude: wrap_deg(y.atan2(x) / RADEG + GALACTIC_NODE),
        latitude: sin_b.asin() / RADEG,
    }
}

/// Galactic → equatorial coordinates.
pub fn galactic_to_equatorial(position: &GalacticCoordinate) -> EquatorialCoordinate {
    let l = (position.longitude - GALACTIC_NODE) * RADEG;
    let (sb, cb) = (position.latitude * RADEG).sin_cos();
    let (sp, cp) = (GALACTIC_POLE_DEC * RADEG).sin_cos();

    let sin_d = (cb * cp * l.sin() + sb * sp).clamp(-1.0, 1.0);
    let y = cb * l.cos();
    let x = sb * cp - cb * sp * l.sin();

    EquatorialCoordinate {
        right_ascension: wrap_hours((y.atan2(x) / RADEG + GALACTIC_POLE_RA) / DEGREES_PER_HOUR),
        declination: sin_d.asin() / RADEG,
    }
}

/// Angle between two equatorial directions, in degrees.
///
/// Computed from the unit vectors, which keeps full precision for nearly coincident and
/// nearly antipodal pairs.
pub fn angular_separation(a: &EquatorialCoordinate, b: &EquatorialCoordinate) -> Degree {
    let va = unit_vector(a.right_ascension * DEGREES_PER_HOUR, a.declination);
    let vb = unit_vector(b.right_ascension * DEGREES_PER_HOUR, b.declination);
    va.angle(&vb) / RADEG
}

// -------------------------------------------------------------------------------------------------
// Refraction
// -------------------------------------------------------------------------------------------------

/// Surface conditions entering the refraction formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Pressure in millibars
    pub pressure_mbar: f64,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
}

impl Atmosphere {
    pub fn new(pressure_mbar: f64, temperature_c: f64) -> Result<Self, AlmagestError> {
        ensure_finite(pressure_mbar, "pressure")?;
        ensure_finite(temperature_c, "temperature")?;
        if pressure_mbar < 0.0 || temperature_c <= -273.0 {
            return Err(AlmagestError::OutOfDomain(format!(
                "unphysical atmosphere: {pressure_mbar} mbar, {temperature_c} °C"
            )));
        }
        Ok(Atmosphere {
            pressure_mbar,
            temperature_c,
        })
    }
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere {
            pressure_mbar: 1010.0,
            temperature_c: 10.0,
        }
    }
}

/// Refraction at apparent `altitude` (degrees), in degrees.
///
/// Three regimes:
/// * altitude ≥ 15°: `0.00007888888·P / ((273 + T)·tan h)` radians,
/// * -5° < altitude < 15°: `(0.1594 + 0.0196h + 0.00002h²)·P / ((273 + T)(1 + 0.505h + 0.0845h²))` degrees,
/// * altitude ≤ -5°: no correction.
fn refraction_at(altitude: Degree, atmosphere: &Atmosphere) -> Degree {
    let p = atmosphere.pressure_mbar;
    let t = 273.0 + atmosphere.temperature_c;
    if altitude >= 15.0 {
        0.00007888888 * p / (t * (altitude * RADEG).tan()) / RADEG
    } else if altitude > -5.0 {
        let h = altitude;
        ((0.00002 * h + 0.0196) * h + 0.1594) * p / (t * ((0.0845 * h + 0.505) * h + 1.0))
    } else {
        0.0
    }
}

/// Geometric (true) altitude → apparent altitude, in degrees.
///
/// The refraction depends on the apparent altitude, so it is found by fixed-point
/// iteration `h_app = h_true + R(h_app)` starting from `R = 0`, stopping when successive
/// corrections differ by less than `params.angle_tolerance`.
///
/// Errors
/// ------
/// * `NonFiniteInput` / `OutOfDomain` for an invalid altitude.
/// * `NoConvergence` when `params.max_iterations` is exhausted.
pub fn true_to_apparent_altitude(
    altitude: Degree,
    atmosphere: &Atmosphere,
    params: &SolverParams,
) -> Result<Degree, AlmagestError> {
    check_latitude(altitude, "altitude")?;
    let tolerance = params.angle_tolerance / RADEG;
    let mut correction = 0.0;
    let out = bounded_loop("refraction", params.max_iterations, |_| {
        let next = refraction_at(altitude + correction, atmosphere);
        let done = (next - correction).abs() < tolerance;
        correction = next;
        Ok(if done {
            ControlFlow::Break(altitude + next)
        } else {
            ControlFlow::Continue(())
        })
    })?;
    match out {
        Some((apparent, _)) => Ok(apparent.min(90.0)),
        None => Err(AlmagestError::NoConvergence {
            solver: "refraction",
            iterations: params.max_iterations,
        }),
    }
}

/// Apparent altitude → geometric (true) altitude, in degrees. Single pass.
pub fn apparent_to_true_altitude(
    altitude: Degree,
    atmosphere: &Atmosphere,
) -> Result<Degree, AlmagestError> {
    check_latitude(altitude, "altitude")?;
    Ok(altitude - refraction_at(altitude, atmosphere))
}

// -------------------------------------------------------------------------------------------------
// Parallax
// -------------------------------------------------------------------------------------------------

/// Equatorial horizontal parallax (degrees) of a body at `distance` kilometres.
pub fn horizontal_parallax(distance: Kilometer) -> Result<Degree, AlmagestError> {
    ensure_finite(distance, "distance")?;
    if distance <= EARTH_RADIUS_KM {
        return Err(AlmagestError::OutOfDomain(format!(
            "distance {distance} km is inside the Earth"
        )));
    }
    Ok((EARTH_RADIUS_KM / distance).asin() / RADEG)
}

/// Geocentric → topocentric hour angle and declination.
///
/// Arguments
/// ---------
/// * `position`: geocentric hour angle (hours) and declination (degrees).
/// * `location`: observer latitude and elevation; longitude is not used.
/// * `horizontal_parallax`: equatorial horizontal parallax of the body, in degrees.
///
/// Return
/// ------
/// * The hour angle and declination seen from the observer's position on the surface.
///
/// Errors
/// ------
/// * `OutOfDomain` when `horizontal_parallax` is not in `(0, 90)`.
pub fn topocentric_parallax(
    position: &HourAngleCoordinate,
    location: &GeographicLocation,
    horizontal_parallax: Degree,
) -> Result<HourAngleCoordinate, AlmagestError> {
    ensure_finite(horizontal_parallax, "horizontal parallax")?;
    if horizontal_parallax <= 0.0 || horizontal_parallax >= 90.0 {
        return Err(AlmagestError::OutOfDomain(format!(
            "horizontal parallax {horizontal_parallax} outside (0, 90)"
        )));
    }
    let (rho_sin, rho_cos) = location.geocentric_terms();
    // geocentric distance in Earth radii
    let rp = 1.0 / (horizontal_parallax * RADEG).sin();

    let h = position.hour_angle * DEGREES_PER_HOUR * RADEG;
    let (sd, cd) = (position.declination * RADEG).sin_cos();

    let dh = (rho_cos * h.sin() / (rp * cd - rho_cos * h.cos())).atan();
    let hp = h + dh;
    let dec = (hp.cos() * (rp * sd - rho_sin) / (rp * cd * h.cos() - rho_cos)).atan();

    Ok(HourAngleCoordinate {
        hour_angle: wrap_hours(wrap_rad(hp) / RADEG / DEGREES_PER_HOUR),
        declination: dec / RADEG,
    })
}
