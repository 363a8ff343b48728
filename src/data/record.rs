use std::fmt::Write;

use crate::error::ParseError;

/// Width and height of a digit image.
pub const IMAGE_SIDE: usize = 28;
/// Pixels per record.
pub const PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;
/// Number of digit classes.
pub const CLASSES: usize = 10;
/// Label column plus one column per pixel.
pub const FIELDS: usize = PIXELS + 1;

/// One labelled 28×28 greyscale digit. The label is always a digit class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    label: u8,
    pixels: [u8; PIXELS],
}

impl Record {
    pub fn new(label: u8, pixels: [u8; PIXELS]) -> Result<Record, ParseError> {
        if usize::from(label) >= CLASSES {
            return Err(ParseError::InvalidLabel(label));
        }
        Ok(Record { label, pixels })
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    pub fn pixels(&self) -> &[u8; PIXELS] {
        &self.pixels
    }

    /// Decodes a dataset line of the form `label,p0,p1,...,p783`.
    ///
    /// Every field must be 1-3 ASCII digits with a value in 0-255, and the
    /// label must name a digit class. A single trailing `\r` is ignored.
    pub fn decode(line: &str) -> Result<Record, ParseError> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let found = line.split(',').count();
        if found != FIELDS {
            return Err(ParseError::FieldCount {
                expected: FIELDS,
                found,
            });
        }

        let (label_text, rest) = line.split_once(',').unwrap_or((line, ""));
        let label = parse_byte(0, label_text)?;

        let mut pixels = [0u8; PIXELS];
        for (index, (text, pixel)) in rest.split(',').zip(pixels.iter_mut()).enumerate() {
            *pixel = parse_byte(index + 1, text)?;
        }

        Record::new(label, pixels)
    }

    /// Renders the image as 28 lines of 56 uppercase hex characters, one
    /// byte per pixel, each line terminated by `\n`.
    pub fn hex_dump(&self) -> String {
        let mut out = String::with_capacity(IMAGE_SIDE * (IMAGE_SIDE * 2 + 1));
        for row in self.pixels.chunks(IMAGE_SIDE) {
            for pixel in row {
                // Writing to a String cannot fail.
                let _ = write!(out, "{:02X}", pixel);
            }
            out.push('\n');
        }
        out
    }
}

fn parse_byte(index: usize, text: &str) -> Result<u8, ParseError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() > 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ParseError::InvalidField {
            index,
            text: text.to_string(),
        });
    }
    let value = bytes
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    u8::try_from(value).map_err(|_| ParseError::OutOfRange { index, value })
}
