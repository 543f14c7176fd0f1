use crate::prelude::*;
use std::fmt;

/// Where in the input an error was detected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// name of the section being parsed (without the `$`), if any
    pub section: Option<String>,
    /// 1-based line number. Inside binary payloads this is the line the payload started on
    pub line: usize,
    /// byte offset from the start of the input
    pub offset: u64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(
                f,
                "section `${}`, line {}, byte {}",
                section, self.line, self.offset
            ),
            None => write!(f, "line {}, byte {}", self.line, self.offset),
        }
    }
}

#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    MissingHeader(MissingHeader),
    #[error("{0}")]
    UnsupportedVersion(UnsupportedVersion),
    #[error("{0}")]
    EndiannessMismatch(EndiannessMismatch),
    #[error("{0}")]
    MalformedSection(MalformedSection),
    #[error("{0}")]
    CountMismatch(CountMismatch),
    #[error("{0}")]
    UnknownElementType(UnknownElementType),
    #[error("{0}")]
    TruncatedFile(TruncatedFile),
    #[error("{0}")]
    Io(Io),
}

impl ParseError {
    /// where the error was detected
    pub fn location(&self) -> &Location {
        match self {
            Self::MissingHeader(err) => &err.location,
            Self::UnsupportedVersion(err) => &err.location,
            Self::EndiannessMismatch(err) => &err.location,
            Self::MalformedSection(err) => &err.location,
            Self::CountMismatch(err) => &err.location,
            Self::UnknownElementType(err) => &err.location,
            Self::TruncatedFile(err) => &err.location,
            Self::Io(err) => &err.location,
        }
    }

    /// name of the section the error was detected in
    pub fn section(&self) -> Option<&str> {
        self.location().section.as_deref()
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "expected a `$MeshFormat` header ({reason}) at {location}")]
pub struct MissingHeader {
    pub reason: String,
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unsupported msh version `{version}` at {location}, only 2.2 and 4.1 can be read")]
pub struct UnsupportedVersion {
    pub version: String,
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "binary endianness marker is {found:?}, which is 1 in neither byte order, at {location}"
)]
pub struct EndiannessMismatch {
    pub found: [u8; 4],
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "malformed section: {message} at {location}")]
pub struct MalformedSection {
    pub message: String,
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{what}: declared {declared}, found {actual} at {location}")]
pub struct CountMismatch {
    pub what: &'static str,
    pub declared: u64,
    pub actual: u64,
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unknown element type code {code} at {location}")]
pub struct UnknownElementType {
    pub code: i64,
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "file ended before the section was closed at {location}")]
pub struct TruncatedFile {
    pub location: Location,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "failed to read from the source ({source}) at {location}")]
pub struct Io {
    pub source: std::io::Error,
    pub location: Location,
}
