use crate::Encoding;
use std::fmt;

/// Version of the msh layout stored in the `$MeshFormat` header
///
/// Only two revisions are understood: the legacy flat layout (`2.2`) and the
/// entity block layout (`4.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// legacy flat-list layout
    pub const V2_2: Version = Version { major: 2, minor: 2 };
    /// entity block layout
    pub const V4_1: Version = Version { major: 4, minor: 1 };

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// parse a version token such as `4.1` or `2.2`. Trailing zeros in the minor
    /// number (`4.10`) are not normalized.
    pub fn from_token(token: &str) -> Option<Self> {
        let (major, minor) = match token.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (token, "0"),
        };

        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    pub fn is_supported(&self) -> bool {
        *self == Self::V2_2 || *self == Self::V4_1
    }

    /// true for the flat, pre-entity layout
    pub fn is_legacy(&self) -> bool {
        self.major < 4
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::V4_1
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Width of the `size_t` fields in binary files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntSize {
    Four,
    #[default]
    Eight,
}

impl IntSize {
    pub fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    pub fn bytes(&self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// largest tag / count representable with this width
    pub fn max_value(&self) -> u64 {
        match self {
            Self::Four => u32::MAX as u64,
            Self::Eight => u64::MAX,
        }
    }
}

/// Byte order of every binary payload in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// byte order of the machine we are running on
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    pub fn swapped(&self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

/// Everything the `$MeshFormat` header establishes for the rest of the file.
///
/// Once a header is parsed these values are fixed for every following section of
/// the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshFormat {
    pub version: Version,
    pub encoding: Encoding,
    pub int_size: IntSize,
    pub byte_order: ByteOrder,
}

impl MeshFormat {
    pub fn new(version: Version, encoding: Encoding, int_size: IntSize) -> Self {
        Self {
            version,
            encoding,
            int_size,
            byte_order: ByteOrder::native(),
        }
    }

    pub fn is_binary(&self) -> bool {
        self.encoding.is_binary()
    }
}
