use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that may not appear in a stored object name
    /// - Kept: ASCII letters, digits, '.', '-'
    /// - Replaced with '_': everything else (spaces, slashes, unicode, ...)
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9.\-]").unwrap();
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(filename, "_").into_owned()
}

pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("IMG_0001.jpg"), "IMG_0001.jpg");
        assert_eq!(sanitize_filename("my photo.jpeg"), "my_photo.jpeg");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("写真-1.png"), "__-1.png");
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(is_valid_latitude(35.0));
        assert!(is_valid_latitude(-90.0));
        assert!(!is_valid_latitude(90.0001));
        assert!(!is_valid_latitude(f64::NAN));
        assert!(is_valid_longitude(139.0));
        assert!(is_valid_longitude(-180.0));
        assert!(!is_valid_longitude(180.5));
    }
}
