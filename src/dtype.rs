//! Data type tags and the element binding trait.
//!
//! A [`DType`] is a runtime identity for an array's element representation.
//! It determines the element byte width (opaque for [`DType::Generic`]), a
//! single-character abbreviation, and which accessor implementation a buffer
//! binds at construction. The tag set is closed: dispatch over it is always
//! exhaustive, and parsing an unknown tag string fails with
//! [`UnsupportedDType`](crate::NdarrayError::UnsupportedDType).

use std::fmt;
use std::str::FromStr;

use num_complex::{Complex32, Complex64};

use crate::NdarrayError;

/// Supported data type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Double-precision floating-point.
    Float64,
    /// Single-precision floating-point.
    Float32,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Double-precision complex floating-point (two `f64` fields).
    Complex128,
    /// Single-precision complex floating-point (two `f32` fields).
    Complex64,
    /// Boolean.
    Bool,
    /// Arbitrary boxed values; byte width is opaque.
    Generic,
}

impl DType {
    /// Number of bytes per element, or `None` for [`DType::Generic`].
    pub fn bytes_per_element(&self) -> Option<usize> {
        match self {
            DType::Float64 => Some(8),
            DType::Float32 => Some(4),
            DType::Int32 => Some(4),
            DType::Uint8 => Some(1),
            DType::Complex128 => Some(16),
            DType::Complex64 => Some(8),
            DType::Bool => Some(1),
            DType::Generic => None,
        }
    }

    /// Single-character abbreviation for the data type.
    pub fn char(&self) -> char {
        match self {
            DType::Float64 => 'd',
            DType::Float32 => 'f',
            DType::Int32 => 'i',
            DType::Uint8 => 'b',
            DType::Complex128 => 'z',
            DType::Complex64 => 'c',
            DType::Bool => 'x',
            DType::Generic => 'o',
        }
    }

    /// Whether the data type is a real floating-point type.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, DType::Float64 | DType::Float32)
    }

    /// Whether the data type is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, DType::Int32 | DType::Uint8)
    }

    /// Whether the data type is a complex floating-point type.
    ///
    /// Complex elements are stored as two adjacent real-typed slots; see
    /// [`InterleavedBuffer`](crate::buffer::InterleavedBuffer).
    pub fn is_complex(&self) -> bool {
        matches!(self, DType::Complex128 | DType::Complex64)
    }

    /// Whether the data type is numeric (real, integer, or complex).
    pub fn is_numeric(&self) -> bool {
        self.is_floating_point() || self.is_integer() || self.is_complex()
    }
}

impl Default for DType {
    fn default() -> Self {
        DType::Float64
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::Float64 => "float64",
            DType::Float32 => "float32",
            DType::Int32 => "int32",
            DType::Uint8 => "uint8",
            DType::Complex128 => "complex128",
            DType::Complex64 => "complex64",
            DType::Bool => "bool",
            DType::Generic => "generic",
        };
        f.write_str(s)
    }
}

impl FromStr for DType {
    type Err = NdarrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float64" => Ok(DType::Float64),
            "float32" => Ok(DType::Float32),
            "int32" => Ok(DType::Int32),
            "uint8" => Ok(DType::Uint8),
            "complex128" => Ok(DType::Complex128),
            "complex64" => Ok(DType::Complex64),
            "bool" => Ok(DType::Bool),
            "generic" => Ok(DType::Generic),
            other => Err(NdarrayError::UnsupportedDType(other.to_string())),
        }
    }
}

/// Binds a Rust element type to its [`DType`] tag.
///
/// Implemented for the closed set of numeric and boolean types. Custom
/// element types opt in as generic containers:
///
/// ```ignore
/// #[derive(Clone)]
/// struct Label(String);
/// impl Element for Label {
///     const DTYPE: DType = DType::Generic;
/// }
/// ```
pub trait Element: Clone + 'static {
    /// The data type tag for this element type.
    const DTYPE: DType;
}

impl Element for f64 {
    const DTYPE: DType = DType::Float64;
}

impl Element for f32 {
    const DTYPE: DType = DType::Float32;
}

impl Element for i32 {
    const DTYPE: DType = DType::Int32;
}

impl Element for u8 {
    const DTYPE: DType = DType::Uint8;
}

impl Element for Complex64 {
    const DTYPE: DType = DType::Complex128;
}

impl Element for Complex32 {
    const DTYPE: DType = DType::Complex64;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!("float64".parse::<DType>().unwrap(), DType::Float64);
        assert_eq!("complex64".parse::<DType>().unwrap(), DType::Complex64);
        assert_eq!("generic".parse::<DType>().unwrap(), DType::Generic);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let err = "float16".parse::<DType>().unwrap_err();
        assert!(matches!(err, NdarrayError::UnsupportedDType(ref s) if s == "float16"));
    }

    #[test]
    fn test_bytes_per_element() {
        assert_eq!(DType::Float64.bytes_per_element(), Some(8));
        assert_eq!(DType::Complex128.bytes_per_element(), Some(16));
        assert_eq!(DType::Uint8.bytes_per_element(), Some(1));
        assert_eq!(DType::Generic.bytes_per_element(), None);
    }

    #[test]
    fn test_char_codes() {
        assert_eq!(DType::Float64.char(), 'd');
        assert_eq!(DType::Complex128.char(), 'z');
        assert_eq!(DType::Generic.char(), 'o');
    }

    #[test]
    fn test_predicates() {
        assert!(DType::Float32.is_floating_point());
        assert!(DType::Int32.is_integer());
        assert!(DType::Complex64.is_complex());
        assert!(DType::Complex128.is_numeric());
        assert!(!DType::Bool.is_numeric());
        assert!(!DType::Generic.is_numeric());
    }

    #[test]
    fn test_display_round_trip() {
        for dt in [
            DType::Float64,
            DType::Float32,
            DType::Int32,
            DType::Uint8,
            DType::Complex128,
            DType::Complex64,
            DType::Bool,
            DType::Generic,
        ] {
            assert_eq!(dt.to_string().parse::<DType>().unwrap(), dt);
        }
    }

    #[test]
    fn test_element_bindings() {
        assert_eq!(<f64 as Element>::DTYPE, DType::Float64);
        assert_eq!(<Complex64 as Element>::DTYPE, DType::Complex128);
        assert_eq!(<bool as Element>::DTYPE, DType::Bool);
    }
}
