//! # Position and phase of the Moon
//!
//! [`moon_position`] sums the classical periodic series in longitude, latitude and
//! horizontal parallax. Every term is a sine (cosine for the parallax) of an integer
//! combination of four fundamental arguments:
//!
//! | symbol | meaning                          |
//! |--------|----------------------------------|
//! | `D`    | mean elongation of the Moon      |
//! | `M`    | mean anomaly of the Sun          |
//! | `M'`   | mean anomaly of the Moon         |
//! | `F`    | mean argument of latitude        |
//!
//! Terms involving `M` are scaled by `E^|k|`, `E` being the secular decrease of the Earth's
//! orbital eccentricity.
//!
//! [`approximate_moon_position`] is the short theory: evection, annual equation and
//! variation applied to mean elements frozen at 2010 January 0.0, with a two-term
//! equation of centre.
use serde::{Deserialize, Serialize};

use crate::almagest_errors::AlmagestError;
use crate::angle::{fract, wrap_deg};
use crate::bodies::sun::sun_position;
use crate::constants::{Degree, Kilometer, EARTH_RADIUS_KM, EPOCH_2010, J1900, RADEG};
use crate::coordinates::{
    ecliptic_to_equatorial, horizontal_parallax, EclipticCoordinate, EquatorialCoordinate,
};
use crate::earth_orientation::{nutation, true_obliquity};
use crate::time::JulianDay;

/// Semi-major axis of the lunar orbit (km)
pub const MEAN_DISTANCE_KM: Kilometer = 384_401.0;
/// Angular diameter of the Moon at [`MEAN_DISTANCE_KM`] (degrees)
const ANGULAR_DIAMETER_MEAN: Degree = 0.5181;
/// Eccentricity of the lunar orbit
const ECCENTRICITY: f64 = 0.0549;
/// Inclination of the lunar orbit on the ecliptic (degrees)
const INCLINATION: Degree = 5.145396;

/// Geocentric position of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarPosition {
    pub ecliptic: EclipticCoordinate,
    pub equatorial: EquatorialCoordinate,
    pub distance_km: Kilometer,
    pub horizontal_parallax: Degree,
    pub angular_diameter: Degree,
    /// Mean anomaly of the Moon, `M'` (degrees)
    pub mean_anomaly: Degree,
    /// Argument of latitude, `F` (degrees)
    pub argument_of_latitude: Degree,
}

/// One term of a lunar series: amplitude and multipliers of `(D, M, M', F)`.
type LunarTerm = (f64, [i8; 4]);

#[rustfmt::skip]
const LONGITUDE_TERMS: [LunarTerm; 50] = [
    (6.28875, [0, 0, 1, 0]),     (1.274018, [2, 0, -1, 0]),   (0.658309, [2, 0, 0, 0]),
    (0.213616, [0, 0, 2, 0]),    (-0.185596, [0, 1, 0, 0]),   (-0.114336, [0, 0, 0, 2]),
    (0.058793, [2, 0, -2, 0]),   (0.057212, [2, -1, -1, 0]),  (0.05332, [2, 0, 1, 0]),
    (0.045874, [2, -1, 0, 0]),   (0.041024, [0, -1, 1, 0]),   (-0.034718, [1, 0, 0, 0]),
    (-0.030465, [0, 1, 1, 0]),   (0.015326, [2, 0, 0, -2]),   (-0.012528, [0, 0, 1, 2]),
    (-0.01098, [0, 0, -1, 2]),   (0.010674, [4, 0, -1, 0]),   (0.010034, [0, 0, 3, 0]),
    (0.008548, [4, 0, -2, 0]),   (-0.00791, [2, 1, -1, 0]),   (-0.006783, [2, 1, 0, 0]),
    (0.005162, [-1, 0, 1, 0]),   (0.005, [1, 1, 0, 0]),       (0.003862, [4, 0, 0, 0]),
    (0.004049, [2, -1, 1, 0]),   (0.003996, [2, 0, 2, 0]),    (0.003665, [2, 0, -3, 0]),
    (0.002695, [0, -1, 2, 0]),   (0.002602, [-2, 0, 1, -2]),  (0.002396, [2, -1, -2, 0]),
    (-0.002349, [1, 0, 1, 0]),   (0.002249, [2, -2, 0, 0]),   (-0.002125, [0, 1, 2, 0]),
    (-0.002079, [0, 2, 0, 0]),   (0.002059, [2, -2, -1, 0]),  (-0.001773, [2, 0, 1, -2]),
    (-0.001595, [2, 0, 0, 2]),   (0.00122, [4, -1, -1, 0]),   (-0.00111, [0, 0, 2, 2]),
    (0.000892, [-3, 0, 1, 0]),   (-0.000811, [2, 1, 1, 0]),   (0.000761, [4, -1, -2, 0]),
    (0.000704, [-2, -2, 1, 0]),  (0.000693, [2, 1, -2, 0]),   (0.000598, [2, -1, 0, -2]),
    (0.00055, [4, 0, 1, 0]),     (0.000538, [0, 0, 4, 0]),    (0.000521, [4, -1, 0, 0]),
    (0.000486, [-1, 0, 2, 0]),   (0.000717, [0, -2, 1, 0]),
];

#[rustfmt::skip]
const LATITUDE_TERMS: [LunarTerm; 45] = [
    (5.128189, [0, 0, 0, 1]),    (0.280606, [0, 0, 1, 1]),    (0.277693, [0, 0, 1, -1]),
    (0.173238, [2, 0, 0, -1]),   (0.055413, [2, 0, -1, 1]),   (0.046272, [2, 0, -1, -1]),
    (0.032573, [2, 0, 0, 1]),    (0.017198, [0, 0, 2, 1]),    (0.009267, [2, 0, 1, -1]),
    (0.008823, [0, 0, 2, -1]),   (0.008247, [2, -1, 0, -1]),  (0.004323, [2, 0, -2, -1]),
    (0.0042, [2, 0, 1, 1]),      (0.003372, [-2, -1, 0, 1]),  (0.002472, [2, -1, -1, 1]),
    (0.002222, [2, -1, 0, 1]),   (0.002072, [2, -1, -1, -1]), (0.001877, [0, -1, 1, 1]),
    (0.001828, [4, 0, -1, -1]),  (-0.001803, [0, 1, 0, 1]),   (-0.00175, [0, 0, 0, 3]),
    (0.00157, [0, -1, 1, -1]),   (-0.001487, [1, 0, 0, 1]),   (-0.001481, [0, 1, 1, 1]),
    (0.001417, [0, -1, -1, 1]),  (0.00135, [0, -1, 0, 1]),    (0.00133, [-1, 0, 0, 1]),
    (0.001106, [0, 0, 3, 1]),    (0.00102, [4, 0, 0, -1]),    (0.000833, [4, 0, -1, 1]),
    (0.000781, [0, 0, 1, -3]),   (0.00067, [4, 0, -2, 1]),    (0.000606, [2, 0, 0, -3]),
    (0.000597, [2, 0, 2, -1]),   (0.000492, [2, -1, 1, -1]),  (0.00045, [-2, 0, 2, -1]),
    (0.000439, [0, 0, 3, -1]),   (0.000423, [2, 0, 2, 1]),    (0.000422, [2, 0, -3, -1]),
    (-0.000367, [2, 1, -1, 1]),  (-0.000353, [2, 1, 0, 1]),   (0.000331, [4, 0, 0, 1]),
    (0.000317, [2, -1, 1, 1]),   (0.000306, [2, -2, 0, -1]),  (-0.000283, [0, 0, 1, 3]),
];

#[rustfmt::skip]
const PARALLAX_TERMS: [LunarTerm; 30] = [
    (0.051818, [0, 0, 1, 0]),    (0.009531, [2, 0, -1, 0]),   (0.007843, [2, 0, 0, 0]),
    (0.002824, [0, 0, 2, 0]),    (0.000857, [2, 0, 1, 0]),    (0.000533, [2, -1, 0, 0]),
    (0.000401, [2, -1, -1, 0]),  (0.00032, [0, -1, 1, 0]),    (-0.000271, [1, 0, 0, 0]),
    (-0.000264, [0, 1, 1, 0]),   (-0.000198, [0, 0, -1, 2]),  (0.000173, [0, 0, 3, 0]),
    (0.000167, [4, 0, -1, 0]),   (-0.000111, [0, 1, 0, 0]),   (0.000103, [4, 0, -2, 0]),
    (-0.000084, [-2, 0, 2, 0]),  (-0.000083, [2, 1, 0, 0]),   (0.000079, [2, 0, 2, 0]),
    (0.000072, [4, 0, 0, 0]),    (0.000064, [2, -1, 1, 0]),   (-0.000063, [2, 1, -1, 0]),
    (0.000041, [1, 1, 0, 0]),    (0.000035, [0, -1, 2, 0]),   (-0.000033, [-2, 0, 3, 0]),
    (-0.00003, [1, 0, 1, 0]),    (-0.000029, [-2, 0, 0, 2]),  (-0.000029, [0, 1, 2, 0]),
    (0.000026, [2, -2, 0, 0]),   (-0.000023, [-2, 0, 1, 2]),  (0.000019, [4, -1, -1, 0]),
];

/// Fundamental arguments of the lunar theory, in radians.
struct LunarArguments {
    mean_longitude: f64,
    elongation: f64,
    sun_anomaly: f64,
    moon_anomaly: f64,
    latitude_argument: f64,
    node: f64,
    /// Argument of the long-period latitude term
    node_term: f64,
    eccentricity_factor: f64,
}

impl LunarArguments {
    fn at(jd: JulianDay) -> Self {
        let t = jd.centuries_since(J1900);
        let t2 = t * t;
        let q = jd.value() - J1900;

        let mut ml = 270.434164 + 360.0 * fract(q / 27.32158213) - (0.001133 - 0.0000019 * t) * t2;
        let mut ms = 358.475833 + 360.0 * fract(q / 365.2596407) - (0.00015 + 0.0000033 * t) * t2;
        let mut md = 296.104608 + 360.0 * fract(q / 27.55455094) + (0.009192 + 0.0000144 * t) * t2;
        let mut me = 350.737486 + 360.0 * fract(q / 29.53058868) - (0.001436 - 0.0000019 * t) * t2;
        let mut mf = 11.250889 + 360.0 * fract(q / 27.21222039) - (0.003211 + 0.0000003 * t) * t2;
        let na = 259.183275 - 360.0 * fract(q / 6798.363307) + (0.002078 + 0.0000022 * t) * t2;

        // long-period perturbations of the mean elements
        let s1 = ((51.2 + 20.2 * t) * RADEG).sin();
        let s2 = (na * RADEG).sin();
        let s3 = 0.003964 * ((346.56 + (132.87 - 0.0091731 * t) * t) * RADEG).sin();
        let node_term = (na + 275.05 - 2.3 * t) * RADEG;
        let s4 = node_term.sin();

        ml += 0.000233 * s1 + s3 + 0.001964 * s2;
        ms -= 0.001778 * s1;
        md += 0.000817 * s1 + s3 + 0.002541 * s2;
        mf += s3 - 0.024691 * s2 - 0.004328 * s4;
        me += 0.002011 * s1 + s3 + 0.001964 * s2;

        LunarArguments {
            mean_longitude: ml * RADEG,
            elongation: me * RADEG,
            sun_anomaly: ms * RADEG,
            moon_anomaly: md * RADEG,
            latitude_argument: mf * RADEG,
            node: na * RADEG,
            node_term,
            eccentricity_factor: 1.0 - (0.002495 + 0.00000752 * t) * t,
        }
    }

    fn series(&self, terms: &[LunarTerm], periodic: fn(f64) -> f64) -> f64 {
        terms
            .iter()
            .map(|&(amplitude, [d, m, mp, f])| {
                let angle = d as f64 * self.elongation
                    + m as f64 * self.sun_anomaly
                    + mp as f64 * self.moon_anomaly
                    + f as f64 * self.latitude_argument;
                amplitude * self.eccentricity_factor.powi(m.abs() as i32) * periodic(angle)
            })
            .sum()
    }
}

/// Geometric ecliptic longitude and latitude, horizontal parallax, `M'` and `F` (degrees).
fn lunar_series(jd: JulianDay) -> (Degree, Degree, Degree, Degree, Degree) {
    let args = LunarArguments::at(jd);

    let longitude = wrap_deg(args.mean_longitude / RADEG + args.series(&LONGITUDE_TERMS, f64::sin));
    let w1 = 0.0004664 * args.node.cos();
    let w2 = 0.0000754 * args.node_term.cos();
    let latitude = args.series(&LATITUDE_TERMS, f64::sin) * (1.0 - w1 - w2);
    let parallax = 0.950724 + args.series(&PARALLAX_TERMS, f64::cos);

    (
        longitude,
        latitude,
        parallax,
        wrap_deg(args.moon_anomaly / RADEG),
        wrap_deg(args.latitude_argument / RADEG),
    )
}

/// Position of the Moon from the full periodic series.
///
/// The longitude includes nutation; right ascension and declination use the true obliquity
/// of the date. Distance and angular diameter follow from the horizontal parallax.
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (UT) of the instant.
///
/// See also
/// --------
/// * [`approximate_moon_position`] – Short theory.
/// * [`moon_phase`] – Illuminated fraction and bright limb.
pub fn moon_position(jd: JulianDay) -> LunarPosition {
    let jd0 = jd.midnight();
    let (longitude, latitude, parallax, md, mf) = lunar_series(jd);

    let ecliptic = EclipticCoordinate {
        longitude: wrap_deg(longitude + nutation(jd0).longitude),
        latitude,
    };
    let distance_km = EARTH_RADIUS_KM / (parallax * RADEG).sin();
    LunarPosition {
        ecliptic,
        equatorial: ecliptic_to_equatorial(&ecliptic, true_obliquity(jd0)),
        distance_km,
        horizontal_parallax: parallax,
        angular_diameter: ANGULAR_DIAMETER_MEAN * MEAN_DISTANCE_KM / distance_km,
        mean_anomaly: md,
        argument_of_latitude: mf,
    }
}

/// Mean anomaly of the Sun as the short theory takes it (radians).
///
/// The 1900 value advanced at the rate of the Sun's mean longitude, which is how the
/// reference tables of the short theory were computed.
fn short_theory_sun_anomaly(jd: JulianDay) -> f64 {
    let t = jd.centuries_since(J1900);
    let m = 358.47583 - (0.00015 + 0.0000033 * t) * t * t + 360.0 * fract(100.0021359 * t);
    m * RADEG
}

/// Position of the Moon from the short theory.
///
/// Uses the mean elements of 2010 January 0.0 and the geometric longitude of the Sun.
/// The equation of centre is the two-term series `6.2886 sin M'm + 0.214 sin 2M'm` in the
/// corrected anomaly `M'm`. Right ascension and declination use the true obliquity of the
/// date; the longitude carries no nutation.
///
/// Errors
/// ------
/// * `OutOfDomain` if the resulting distance gives no horizontal parallax.
pub fn approximate_moon_position(jd: JulianDay) -> Result<LunarPosition, AlmagestError> {
    const MEAN_LONGITUDE: Degree = 91.9293359879052;
    const PERIGEE_LONGITUDE: Degree = 130.143076320618;
    const NODE_LONGITUDE: Degree = 291.682546643194;

    let d = jd.value() - EPOCH_2010;
    let ls = sun_position(jd).ecliptic.longitude;
    let ms = short_theory_sun_anomaly(jd);

    let lm = wrap_deg(13.1763966 * d + MEAN_LONGITUDE);
    let mm = wrap_deg(lm - 0.1114041 * d - PERIGEE_LONGITUDE);
    let node = wrap_deg(NODE_LONGITUDE - 0.0529539 * d);

    let evection = 1.2739 * ((2.0 * (lm - ls) - mm) * RADEG).sin();
    let annual = 0.1858 * ms.sin();
    let third = 0.37 * ms.sin();
    let anomaly = mm + evection - annual - third;

    let centre = 6.2886 * (anomaly * RADEG).sin();
    let fourth = 0.214 * (2.0 * anomaly * RADEG).sin();
    let corrected = lm + evection + centre - annual + fourth;
    let variation = 0.6583 * (2.0 * (corrected - ls) * RADEG).sin();
    let true_longitude = corrected + variation;
    let node = node - 0.16 * ms.sin();

    let u = (true_longitude - node) * RADEG;
    let i = INCLINATION * RADEG;
    let ecliptic = EclipticCoordinate {
        longitude: wrap_deg((u.sin() * i.cos()).atan2(u.cos()) / RADEG + node),
        latitude: (u.sin() * i.sin()).asin() / RADEG,
    };

    let rho = (1.0 - ECCENTRICITY * ECCENTRICITY)
        / (1.0 + ECCENTRICITY * ((anomaly + centre) * RADEG).cos());
    let distance_km = MEAN_DISTANCE_KM * rho;

    Ok(LunarPosition {
        ecliptic,
        equatorial: ecliptic_to_equatorial(&ecliptic, true_obliquity(jd.midnight())),
        distance_km,
        horizontal_parallax: horizontal_parallax(distance_km)?,
        angular_diameter: ANGULAR_DIAMETER_MEAN / rho,
        mean_anomaly: wrap_deg(anomaly),
        argument_of_latitude: wrap_deg(u / RADEG),
    })
}

/// Vertical displacement of the Moon's upper limb at rising or setting (degrees).
///
/// Semi-diameter plus the standard refraction of 34', less the horizontal parallax `hp`
/// (degrees). The Moon's centre is on the horizon of the observer when its geocentric
/// altitude is `−vd`.
pub fn vertical_displacement(horizontal_parallax: Degree) -> Degree {
    let hp = horizontal_parallax * RADEG;
    (0.27249 * hp.sin() + 0.0098902 - hp) / RADEG
}

/// Phase of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    /// Illuminated fraction of the disc, in `[0, 1]`
    pub illuminated_fraction: f64,
    /// Position angle of the midpoint of the bright limb, from north through east
    pub bright_limb_angle: Degree,
    /// Geocentric elongation from the Sun, in `[0, 180]`
    pub elongation: Degree,
}

/// Illuminated fraction and bright limb angle at `jd`.
///
/// The phase angle is `180° − d`, `d` the elongation, corrected for the finite distance
/// of the Sun. The bright limb angle is computed from the apparent Sun.
pub fn moon_phase(jd: JulianDay) -> MoonPhase {
    let moon = moon_position(jd);
    let sun = sun_position(jd);

    let d = ((moon.ecliptic.longitude - sun.apparent_longitude) * RADEG).cos()
        * (moon.ecliptic.latitude * RADEG).cos();
    let d = d.clamp(-1.0, 1.0).acos();
    let correction = 0.1468 * d.sin() * (1.0 - ECCENTRICITY * (moon.mean_anomaly * RADEG).sin())
        / (1.0 - 0.0167 * (sun.mean_anomaly * RADEG).sin());
    let phase_angle = std::f64::consts::PI - d + correction * RADEG;

    let s = sun.apparent_equatorial(jd);
    let (ds, dm) = (s.declination * RADEG, moon.equatorial.declination * RADEG);
    let dra = (s.right_ascension - moon.equatorial.right_ascension) * 15.0 * RADEG;
    let y = ds.cos() * dra.sin();
    let x = dm.cos() * ds.sin() - dm.sin() * ds.cos() * dra.cos();

    MoonPhase {
        illuminated_fraction: (1.0 + phase_angle.cos()) / 2.0,
        bright_limb_angle: wrap_deg(y.atan2(x) / RADEG),
        elongation: d / RADEG,
    }
}
