//! Unit conversions between CSS pixels, PDF points, and inches.

// =============================================================================
// CONSTANTS
// =============================================================================

/// CSS reference pixel density (96 px per inch)
pub const CSS_PIXELS_PER_INCH: f64 = 96.0;

/// PDF point density (72 pt per inch)
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert CSS pixels to inches at the CSS reference density
#[must_use]
pub fn css_pixels_to_inches(px: f64) -> f64 {
    px / CSS_PIXELS_PER_INCH
}

/// Convert inches to CSS pixels at the CSS reference density
#[must_use]
pub fn inches_to_css_pixels(inches: f64) -> f64 {
    inches * CSS_PIXELS_PER_INCH
}

/// Convert PDF points to inches
#[must_use]
pub fn points_to_inches(points: f64) -> f64 {
    points / POINTS_PER_INCH
}
