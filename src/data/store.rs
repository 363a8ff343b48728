use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::data::record::Record;
use crate::error::{Error, ParseError, Result};

/// Upper bound accepted for the record-count capacity hint.
pub const MAX_RECORD_HINT: usize = 10_000_000;

/// In-memory, ordered collection of decoded records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Reads and decodes a CSV dataset file.
    ///
    /// `capacity_hint` only pre-reserves space; it never changes the result.
    pub fn load(path: impl AsRef<Path>, capacity_hint: usize) -> Result<RecordStore> {
        let path = path.as_ref();
        let started = Instant::now();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let store = RecordStore::from_reader(BufReader::new(file), capacity_hint)
            .map_err(|e| match e {
                Error::Io { source, .. } => Error::io(path, source),
                other => other,
            })?;
        log::info!(
            "loaded {} records from {} in {:.3}s",
            store.len(),
            path.display(),
            started.elapsed().as_secs_f64()
        );
        Ok(store)
    }

    /// Decodes every non-blank line of `reader`. Line numbers in errors are
    /// 1-based.
    pub fn from_reader<R: BufRead>(reader: R, capacity_hint: usize) -> Result<RecordStore> {
        let mut reader = reader;
        let mut records = Vec::with_capacity(capacity_hint.min(MAX_RECORD_HINT));
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::io("<dataset>", e))?;
            if n == 0 {
                break;
            }
            line_no += 1;

            let parse_err = |source| Error::Parse {
                line: line_no,
                source,
            };
            let line = std::str::from_utf8(&buf).map_err(|_| parse_err(ParseError::InvalidUtf8))?;
            let line = line.strip_suffix('\n').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            records.push(Record::decode(line).map_err(parse_err)?);
        }
        Ok(RecordStore { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        RecordStore { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::PIXELS;
    use std::io::Cursor;

    fn line(label: u8, fill: u8) -> String {
        let pixels = vec![fill.to_string(); PIXELS];
        format!("{},{}", label, pixels.join(","))
    }

    #[test]
    fn keeps_file_order_and_skips_blank_lines() {
        let text = format!("{}\n\n{}\n", line(4, 1), line(2, 9));
        let store = RecordStore::from_reader(Cursor::new(text), 0).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().label(), 4);
        assert_eq!(store.get(1).unwrap().pixels()[0], 9);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn capacity_hint_does_not_change_contents() {
        let text = line(1, 0);
        let store = RecordStore::from_reader(Cursor::new(text), 1000).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reports_line_number_of_bad_record() {
        let text = format!("{}\n{}\n1,2\n", line(0, 0), line(1, 1));
        match RecordStore::from_reader(Cursor::new(text), 0) {
            Err(Error::Parse {
                line: 3,
                source: ParseError::FieldCount { found: 2, .. },
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8_is_a_parse_error_with_line_number() {
        let mut bytes = format!("{}\n", line(1, 1)).into_bytes();
        bytes.extend_from_slice(b"\xff\xfe,0\n");
        match RecordStore::from_reader(Cursor::new(bytes), 0) {
            Err(Error::Parse {
                line: 2,
                source: ParseError::InvalidUtf8,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RecordStore::load("/definitely/not/here.csv", 0).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
