/// Decimal places used when an address degrades to raw coordinates
pub const COORDINATE_FALLBACK_PRECISION: usize = 4;

/// Decimal places used when displaying exact coordinates (detail view)
pub const COORDINATE_DISPLAY_PRECISION: usize = 6;

/// Owner path segment for uploads without an owner
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// Map center used when neither the device nor any record provides one (San Francisco)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (37.7749, -122.4194);

pub const DEFAULT_MAP_ZOOM: u8 = 13;
