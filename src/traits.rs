//! # Traits
//!
//! Conversions between in-memory numbers and the two encodings a msh file can hold:
//! whitespace separated decimal text and fixed width binary records.
//!

use crate::mesh::ByteOrder;
use std::io::Write;

/// A number that can be stored in a msh section
///
/// Every implementor has a fixed binary width (`SIZE`) and a textual form that
/// parses back to exactly the same value. Floating point values are formatted with
/// `ryu`, which produces the shortest string that round trips.
pub trait Numeric: Copy + Sized {
    /// width in bytes of the binary record
    const SIZE: usize;

    /// append the binary record for `self` to `buffer`
    fn extend_bytes(self, order: ByteOrder, buffer: &mut Vec<u8>);

    /// decode a binary record. `bytes` must be exactly `SIZE` long
    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Option<Self>;

    /// append the decimal form of `self` to `buffer`
    fn push_ascii(self, buffer: &mut String);
}

macro_rules! integer_numeric {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn extend_bytes(self, order: ByteOrder, buffer: &mut Vec<u8>) {
                    match order {
                        ByteOrder::Little => buffer.extend_from_slice(&self.to_le_bytes()),
                        ByteOrder::Big => buffer.extend_from_slice(&self.to_be_bytes()),
                    }
                }

                fn from_bytes(bytes: &[u8], order: ByteOrder) -> Option<Self> {
                    let bytes = bytes.try_into().ok()?;
                    Some(match order {
                        ByteOrder::Little => <$ty>::from_le_bytes(bytes),
                        ByteOrder::Big => <$ty>::from_be_bytes(bytes),
                    })
                }

                fn push_ascii(self, buffer: &mut String) {
                    use std::fmt::Write;
                    // writing to a String never fails
                    let _ = write!(buffer, "{}", self);
                }
            }
        )*
    };
}

integer_numeric!(i32, u32, i64, u64);

impl Numeric for f64 {
    const SIZE: usize = 8;

    fn extend_bytes(self, order: ByteOrder, buffer: &mut Vec<u8>) {
        match order {
            ByteOrder::Little => buffer.extend_from_slice(&self.to_le_bytes()),
            ByteOrder::Big => buffer.extend_from_slice(&self.to_be_bytes()),
        }
    }

    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Option<Self> {
        let bytes = bytes.try_into().ok()?;
        Some(match order {
            ByteOrder::Little => f64::from_le_bytes(bytes),
            ByteOrder::Big => f64::from_be_bytes(bytes),
        })
    }

    fn push_ascii(self, buffer: &mut String) {
        let mut ryu_buffer = ryu::Buffer::new();
        buffer.push_str(ryu_buffer.format(self));
    }
}

/// Writing a run of numbers in one go
///
/// Implemented for slices of any [`Numeric`], which is how coordinate, tag and
/// data buffers are handed to the writer.
pub trait Array {
    /// write the values as text separated by single spaces, without a trailing newline
    fn write_ascii<W: Write>(&self, writer: &mut W) -> Result<(), crate::Error>;

    /// write the values as packed binary records in the given byte order
    fn write_binary<W: Write>(&self, writer: &mut W, order: ByteOrder) -> Result<(), crate::Error>;

    /// number of values
    fn length(&self) -> usize;
}

impl<T: Numeric> Array for [T] {
    fn write_ascii<W: Write>(&self, writer: &mut W) -> Result<(), crate::Error> {
        let mut data = String::new();

        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                data.push(' ');
            }
            value.push_ascii(&mut data);
        }

        writer.write_all(data.as_bytes())?;
        Ok(())
    }

    fn write_binary<W: Write>(&self, writer: &mut W, order: ByteOrder) -> Result<(), crate::Error> {
        let mut bytes = Vec::with_capacity(self.len() * T::SIZE);

        for value in self {
            value.extend_bytes(order, &mut bytes);
        }

        writer.write_all(&bytes)?;
        Ok(())
    }

    fn length(&self) -> usize {
        self.len()
    }
}
