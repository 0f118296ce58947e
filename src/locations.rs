//! Built-in coordinates for the known immigration control points.
//!
//! Source: <https://www.immd.gov.hk/eng/contactus/control_points.html>

use crate::model::ControlPointLocation;

/// `(control point, latitude, longitude)`
pub static KNOWN_CONTROL_POINTS: &[(&str, f64, f64)] = &[
    ("Airport", 22.3080, 113.9185),
    ("Express Rail Link West Kowloon", 22.3033, 114.1608),
    ("Hung Hom", 22.3032, 114.1821),
    ("Lo Wu", 22.5285, 114.1204),
    ("Lok Ma Chau Spur Line", 22.5016, 114.0731),
    ("Heung Yuen Wai", 22.5567, 114.1768),
    ("Hong Kong-Zhuhai-Macao Bridge", 22.3193, 113.9462),
    ("Lok Ma Chau", 22.5117, 114.0708),
    ("Man Kam To", 22.5370, 114.1294),
    ("Sha Tau Kok", 22.5483, 114.2100),
    ("Shenzhen Bay", 22.4929, 113.9184),
    ("China Ferry Terminal", 22.2961, 114.1682),
    ("Harbour Control", 22.2936, 114.1751),
    ("Kai Tak Cruise Terminal", 22.3076, 114.2166),
    ("Macau Ferry Terminal", 22.2877, 114.1510),
    ("Tuen Mun Ferry Terminal", 22.3881, 113.9621),
];

/// Map centre used by the dashboard, roughly Kowloon.
pub const MAP_CENTER: (f64, f64) = (22.3193, 114.1694);
pub const MAP_ZOOM: u8 = 11;

/// The built-in table as owned rows.
pub fn builtin() -> Vec<ControlPointLocation> {
    KNOWN_CONTROL_POINTS
        .iter()
        .map(|&(name, latitude, longitude)| ControlPointLocation {
            control_point: name.to_string(),
            latitude,
            longitude,
        })
        .collect()
}
