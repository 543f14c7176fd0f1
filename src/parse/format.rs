use super::error::{EndiannessMismatch, MissingHeader, UnsupportedVersion};
use super::reader::MshReader;
use crate::mesh::{ByteOrder, IntSize, MeshFormat, Version};
use crate::prelude::*;

/// parse the mandatory `$MeshFormat` section that opens every file, and switch
/// the reader to the encoding it declares
pub(crate) fn parse_header<R: BufRead>(reader: &mut MshReader<R>) -> Result<MeshFormat, ParseError> {
    let marker = loop {
        match reader.next_line()? {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break line,
            None => return Err(missing(reader, "the input is empty")),
        }
    };

    if marker.trim() != "$MeshFormat" {
        let reason = format!("found `{}`", marker.trim());
        return Err(missing(reader, &reason));
    }

    reader.enter("MeshFormat");

    let token = reader.token()?;
    let version = Version::from_token(&token)
        .ok_or_else(|| missing(reader, &format!("`{}` is not a version number", token)))?;

    if !version.is_supported() {
        return Err(UnsupportedVersion::new(token, reader.location()).into());
    }

    let token = reader.token()?;
    let encoding = token
        .parse()
        .ok()
        .and_then(Encoding::from_file_type)
        .ok_or_else(|| missing(reader, &format!("`{}` is not a file type", token)))?;

    let token = reader.token()?;
    let int_size = token
        .parse()
        .ok()
        .and_then(IntSize::from_bytes)
        .ok_or_else(|| reader.malformed(format!("data size must be 4 or 8, found `{}`", token)))?;

    let mut format = MeshFormat {
        version,
        encoding,
        int_size,
        byte_order: ByteOrder::native(),
    };

    if encoding.is_binary() {
        reader.rest_of_line()?;
        format.byte_order = detect_byte_order(reader)?;
    }

    reader.format = format;
    reader.expect_end("MeshFormat")?;
    reader.leave();

    log::debug!(
        "msh {} {:?} file, {} byte sizes, {:?} endian",
        format.version,
        format.encoding,
        format.int_size.bytes(),
        format.byte_order
    );

    Ok(format)
}

/// the binary header carries the integer `1` written in the producer's byte order
fn detect_byte_order<R: BufRead>(reader: &mut MshReader<R>) -> Result<ByteOrder, ParseError> {
    let mut one = [0u8; 4];
    reader.read_bytes(&mut one)?;

    if i32::from_le_bytes(one) == 1 {
        Ok(ByteOrder::Little)
    } else if i32::from_be_bytes(one) == 1 {
        Ok(ByteOrder::Big)
    } else {
        Err(EndiannessMismatch::new(one, reader.location()).into())
    }
}

fn missing<R: BufRead>(reader: &MshReader<R>, reason: &str) -> ParseError {
    MissingHeader::new(reason.to_string(), reader.location()).into()
}
