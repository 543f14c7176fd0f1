use super::error::{
    CountMismatch, Io, Location, MalformedSection, TruncatedFile, UnknownElementType,
};
use crate::mesh::{ElementType, MeshFormat};
use crate::prelude::*;
use crate::utils;

use std::io::Read;
use std::str::FromStr;

/// number of binary values decoded per chunk in the bulk readers
const CHUNK: usize = 4096;

/// Token and record reader over a buffered byte source
///
/// Before the header is parsed the reader only understands text. Once the
/// `$MeshFormat` section has set [`format`](Self::format), the `int` / `size` /
/// `float` family switches between whitespace separated tokens and fixed width
/// binary records. Line and byte positions are tracked for error reporting.
pub(crate) struct MshReader<R> {
    inner: R,
    pub(crate) format: MeshFormat,
    line: usize,
    offset: u64,
    section: Option<String>,
}

impl<R: BufRead> MshReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            format: MeshFormat::default(),
            line: 1,
            offset: 0,
            section: None,
        }
    }

    pub(crate) fn location(&self) -> Location {
        Location {
            section: self.section.clone(),
            line: self.line,
            offset: self.offset,
        }
    }

    pub(crate) fn enter(&mut self, section: &str) {
        self.section = Some(section.to_string());
    }

    pub(crate) fn leave(&mut self) {
        self.section = None;
    }

    pub(crate) fn is_binary(&self) -> bool {
        self.format.is_binary()
    }

    //
    // error constructors
    //

    pub(crate) fn malformed<T: Into<String>>(&self, message: T) -> ParseError {
        MalformedSection::new(message.into(), self.location()).into()
    }

    pub(crate) fn truncated(&self) -> ParseError {
        TruncatedFile::new(self.location()).into()
    }

    pub(crate) fn count_mismatch(&self, what: &'static str, declared: u64, actual: u64) -> ParseError {
        CountMismatch::new(what, declared, actual, self.location()).into()
    }

    fn io(&self, err: std::io::Error) -> ParseError {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            self.truncated()
        } else {
            Io::new(err, self.location()).into()
        }
    }

    //
    // raw byte access
    //

    fn peek(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            match self.inner.fill_buf() {
                Ok(buffer) => return Ok(buffer.first().copied()),
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.io(err)),
            }
        }
    }

    fn bump(&mut self, byte: u8) {
        self.inner.consume(1);
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.bump(byte);
        }
        Ok(())
    }

    /// fill `buffer` with the next bytes of the input
    pub(crate) fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<(), ParseError> {
        if let Err(err) = self.inner.read_exact(buffer) {
            return Err(self.io(err));
        }
        self.offset += buffer.len() as u64;
        Ok(())
    }

    //
    // text
    //

    /// the next line without its line terminator, `None` at the end of the input
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut bytes = Vec::new();
        let read = match self.inner.read_until(b'\n', &mut bytes) {
            Ok(read) => read,
            Err(err) => return Err(self.io(err)),
        };

        if read == 0 {
            return Ok(None);
        }

        self.offset += read as u64;
        if bytes.last() == Some(&b'\n') {
            self.line += 1;
            bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// the next whitespace delimited token
    pub(crate) fn token(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace()?;

        let mut bytes = Vec::new();
        while let Some(byte) = self.peek()? {
            if byte.is_ascii_whitespace() {
                break;
            }
            bytes.push(byte);
            self.bump(byte);
        }

        if bytes.is_empty() {
            return Err(self.truncated());
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// the next token parsed as `T`, regardless of the file encoding
    pub(crate) fn ascii<T: FromStr>(&mut self, what: &str) -> Result<T, ParseError> {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("expected {}, found `{}`", what, token)))
    }

    /// a double quoted string. Backslash escapes the next character. An unquoted
    /// word is accepted as is
    pub(crate) fn quoted(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace()?;

        match self.peek()? {
            Some(b'"') => self.bump(b'"'),
            Some(_) => return self.token(),
            None => return Err(self.truncated()),
        }

        let mut bytes = Vec::new();
        loop {
            let byte = self.peek()?.ok_or_else(|| self.truncated())?;
            self.bump(byte);
            match byte {
                b'"' => break,
                b'\\' => {
                    let escaped = self.peek()?.ok_or_else(|| self.truncated())?;
                    self.bump(escaped);
                    bytes.push(escaped);
                }
                _ => bytes.push(byte),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// whatever is left on the current line, trimmed
    pub(crate) fn rest_of_line(&mut self) -> Result<String, ParseError> {
        let line = self.next_line()?.ok_or_else(|| self.truncated())?;
        Ok(line.trim().to_string())
    }

    /// consume the line break that separates a text field from a binary payload
    pub(crate) fn newline(&mut self) -> Result<(), ParseError> {
        while let Some(byte @ (b' ' | b'\t')) = self.peek()? {
            self.bump(byte);
        }

        if self.peek()? == Some(b'\r') {
            self.bump(b'\r');
        }

        match self.peek()? {
            Some(b'\n') => {
                self.bump(b'\n');
                Ok(())
            }
            Some(byte) => Err(self.malformed(format!(
                "expected a line break before binary data, found byte {:#04x}",
                byte
            ))),
            None => Err(self.truncated()),
        }
    }

    //
    // section framing
    //

    /// require the `$End<name>` marker and consume the rest of its line
    pub(crate) fn expect_end(&mut self, name: &str) -> Result<(), ParseError> {
        let expected = format!("$End{}", name);
        let token = self.token()?;

        if token != expected {
            return Err(self.malformed(format!("expected `{}`, found `{}`", expected, token)));
        }

        self.rest_of_line().map(|_| ()).or_else(|err| match err {
            // the closing marker may be the last bytes of the file
            ParseError::TruncatedFile(_) => Ok(()),
            err => Err(err),
        })
    }

    /// discard everything up to and including the `$End<name>` line
    pub(crate) fn skip_section(&mut self, name: &str) -> Result<(), ParseError> {
        let end = format!("$End{}", name);

        loop {
            match self.next_line()? {
                Some(line) if line.trim() == end => return Ok(()),
                Some(_) => continue,
                None => return Err(self.truncated()),
            }
        }
    }

    //
    // encoding dependent values
    //

    fn binary<T: Numeric>(&mut self) -> Result<T, ParseError> {
        let mut bytes = [0u8; 8];
        let bytes = &mut bytes[..T::SIZE];
        self.read_bytes(bytes)?;

        T::from_bytes(bytes, self.format.byte_order).ok_or_else(|| self.truncated())
    }

    /// a 4 byte `int` field
    pub(crate) fn int(&mut self, what: &str) -> Result<i32, ParseError> {
        if self.is_binary() {
            self.binary::<i32>()
        } else {
            self.ascii(what)
        }
    }

    /// a `size_t` field, as wide as the header declared
    pub(crate) fn size(&mut self, what: &str) -> Result<u64, ParseError> {
        if !self.is_binary() {
            return self.ascii(what);
        }

        match self.format.int_size {
            IntSize::Four => self.binary::<u32>().map(u64::from),
            IntSize::Eight => self.binary::<u64>(),
        }
    }

    pub(crate) fn float(&mut self, what: &str) -> Result<f64, ParseError> {
        if self.is_binary() {
            self.binary::<f64>()
        } else {
            self.ascii(what)
        }
    }

    /// a tag stored as a 4 byte `int` in binary, which must not be negative
    pub(crate) fn int_tag(&mut self, what: &str) -> Result<u64, ParseError> {
        if !self.is_binary() {
            return self.ascii(what);
        }

        let tag = self.binary::<i32>()?;
        utils::cast(tag).ok_or_else(|| self.malformed(format!("negative {}: {}", what, tag)))
    }

    /// a count written as text even in binary files, followed by the line break
    /// that starts the binary payload
    pub(crate) fn ascii_count(&mut self, what: &str) -> Result<u64, ParseError> {
        let count = self.ascii(what)?;
        if self.is_binary() {
            self.newline()?;
        }
        Ok(count)
    }

    /// read `count` values of type `T` with `read_one` in text mode or in packed
    /// chunks in binary mode
    fn bulk<T, F>(&mut self, count: u64, out: &mut Vec<T>, what: &str, mut read_one: F) -> Result<(), ParseError>
    where
        T: Numeric,
        F: FnMut(&mut Self, &str) -> Result<T, ParseError>,
    {
        out.reserve(utils::capacity(count, 1));

        if !self.is_binary() {
            for _ in 0..count {
                out.push(read_one(self, what)?);
            }
            return Ok(());
        }

        let mut remaining = count;
        let mut bytes = Vec::new();
        while remaining > 0 {
            let chunk = remaining.min(CHUNK as u64) as usize;
            bytes.resize(chunk * T::SIZE, 0);
            self.read_bytes(&mut bytes)?;

            for record in bytes.chunks_exact(T::SIZE) {
                let value = T::from_bytes(record, self.format.byte_order)
                    .ok_or_else(|| self.truncated())?;
                out.push(value);
            }

            remaining -= chunk as u64;
        }

        Ok(())
    }

    pub(crate) fn floats(&mut self, count: u64, out: &mut Vec<f64>, what: &str) -> Result<(), ParseError> {
        self.bulk(count, out, what, |reader, what| reader.ascii(what))
    }

    pub(crate) fn ints(&mut self, count: u64, out: &mut Vec<i32>, what: &str) -> Result<(), ParseError> {
        self.bulk(count, out, what, |reader, what| reader.ascii(what))
    }

    pub(crate) fn sizes(&mut self, count: u64, out: &mut Vec<u64>, what: &str) -> Result<(), ParseError> {
        if !self.is_binary() || self.format.int_size == IntSize::Eight {
            return self.bulk(count, out, what, |reader, what| reader.ascii(what));
        }

        let mut narrow: Vec<u32> = Vec::new();
        self.bulk(count, &mut narrow, what, |reader, what| reader.ascii(what))?;
        out.extend(narrow.into_iter().map(u64::from));
        Ok(())
    }

    /// an element type code, which must be in the element table
    pub(crate) fn element_type(&mut self) -> Result<ElementType, ParseError> {
        let code = self.int("element type")?;
        ElementType::from_code(code)
            .ok_or_else(|| UnknownElementType::new(code as i64, self.location()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ByteOrder;

    fn reader(bytes: &[u8]) -> MshReader<&[u8]> {
        MshReader::new(bytes)
    }

    #[test]
    fn tokens_and_lines() {
        let mut r = reader(b"  4.1 0\t8\r\n$EndMeshFormat\n");
        assert_eq!(r.token().unwrap(), "4.1");
        assert_eq!(r.ascii::<i32>("file type").unwrap(), 0);
        assert_eq!(r.ascii::<u64>("data size").unwrap(), 8);
        assert_eq!(r.rest_of_line().unwrap(), "");
        assert_eq!(r.location().line, 2);
        r.expect_end("MeshFormat").unwrap();
        assert!(r.next_line().unwrap().is_none());
    }

    #[test]
    fn quoted_strings() {
        let mut r = reader(b" \"a \\\"quoted\\\" name\" bare\n");
        assert_eq!(r.quoted().unwrap(), "a \"quoted\" name");
        assert_eq!(r.quoted().unwrap(), "bare");
        assert!(matches!(r.quoted(), Err(ParseError::TruncatedFile(_))));
    }

    #[test]
    fn bad_numbers_are_malformed() {
        let mut r = reader(b"x1");
        r.enter("Nodes");
        let err = r.ascii::<f64>("coordinate").unwrap_err();
        assert!(matches!(err, ParseError::MalformedSection(_)));
        assert_eq!(err.section(), Some("Nodes"));
    }

    #[test]
    fn binary_records() {
        let mut bytes = b"3\n".to_vec();
        bytes.extend_from_slice(&7i32.to_be_bytes());
        bytes.extend_from_slice(&9u32.to_be_bytes());
        bytes.extend_from_slice(&0.5f64.to_be_bytes());
        bytes.extend_from_slice(&1.5f64.to_be_bytes());

        let mut r = reader(&bytes);
        r.format = MeshFormat {
            encoding: Encoding::Binary,
            int_size: IntSize::Four,
            byte_order: ByteOrder::Big,
            ..MeshFormat::default()
        };

        assert_eq!(r.ascii_count("count").unwrap(), 3);
        assert_eq!(r.int("int").unwrap(), 7);
        assert_eq!(r.size("size").unwrap(), 9);

        let mut floats = Vec::new();
        r.floats(2, &mut floats, "value").unwrap();
        assert_eq!(floats, vec![0.5, 1.5]);

        assert!(matches!(r.float("value"), Err(ParseError::TruncatedFile(_))));
    }

    #[test]
    fn missing_line_break_before_binary() {
        let mut r = reader(b"3 \x01");
        r.format.encoding = Encoding::Binary;
        assert!(matches!(r.ascii_count("count"), Err(ParseError::MalformedSection(_))));
    }

    #[test]
    fn skipping_sections() {
        let mut r = reader(b"$Custom\nstuff\n$EndCustom\n$Next\n");
        assert_eq!(r.next_line().unwrap().as_deref(), Some("$Custom"));
        r.skip_section("Custom").unwrap();
        assert_eq!(r.next_line().unwrap().as_deref(), Some("$Next"));

        let mut r = reader(b"stuff\n");
        assert!(matches!(r.skip_section("Custom"), Err(ParseError::TruncatedFile(_))));
    }
}
