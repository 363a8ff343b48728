//! Plain-text model format.
//!
//! ```text
//! ROWS,COLS          header of the input→hidden matrix
//! w,w,...,w          ROWS lines of COLS comma-separated values
//! ROWS,COLS          header of the hidden→output matrix
//! w,w,...,w          ROWS lines of COLS comma-separated values
//! ```
//!
//! Values are written with Rust's shortest round-trip `f32` formatting, so a
//! save followed by a load reproduces the weights bit for bit.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use crate::error::{Error, FormatError, Result};
use crate::math::Matrix;
use crate::network::network::Network;

impl Network {
    /// Writes both weight matrices to `path`, replacing any existing file.
    pub fn save_model(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_model(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(path, e))?;
        log::info!("saved model to {}", path.display());
        Ok(())
    }

    pub fn write_model<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_matrix(writer, &self.weights_ih)?;
        write_matrix(writer, &self.weights_ho)
    }

    /// Replaces both weight matrices with the ones stored at `path`.
    ///
    /// The file is validated completely before anything is committed; on
    /// error the current weights are kept.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        self.read_model(BufReader::new(file)).map_err(|e| match e {
            Error::Io { source, .. } => Error::io(path, source),
            other => other,
        })?;
        log::info!("loaded model from {}", path.display());
        Ok(())
    }

    pub fn read_model<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = NumberedLines::new(reader.lines());

        let weights_ih = read_matrix(&mut lines, 1, self.weights_ih.shape())?;
        let weights_ho = read_matrix(&mut lines, 2, self.weights_ho.shape())?;

        while let Some((line_no, line)) = lines.next_line()? {
            if !line.trim().is_empty() {
                return Err(FormatError::TrailingData { line: line_no }.into());
            }
        }

        self.weights_ih = weights_ih;
        self.weights_ho = weights_ho;
        Ok(())
    }
}

fn write_matrix<W: Write>(writer: &mut W, m: &Matrix) -> io::Result<()> {
    writeln!(writer, "{},{}", m.rows, m.cols)?;
    for i in 0..m.rows {
        for (j, value) in m.row(i).iter().enumerate() {
            if j > 0 {
                writer.write_all(b",")?;
            }
            write!(writer, "{}", value)?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Parses one header plus its rows into a staging matrix.
fn read_matrix<R: BufRead>(
    lines: &mut NumberedLines<R>,
    matrix: usize,
    (expected_rows, expected_cols): (usize, usize),
) -> Result<Matrix> {
    let (_, header) = lines
        .next_line()?
        .ok_or(FormatError::MissingHeader { matrix })?;
    let (rows, cols) = parse_header(&header).ok_or_else(|| FormatError::BadHeader {
        matrix,
        text: header.clone(),
    })?;
    if rows != expected_rows || cols != expected_cols {
        return Err(FormatError::DimensionMismatch {
            matrix,
            expected_rows,
            expected_cols,
            rows,
            cols,
        }
        .into());
    }

    let mut staged = Matrix::zeros(rows, cols);
    for row in 0..rows {
        let (_, line) = lines.next_line()?.ok_or(FormatError::Truncated {
            matrix,
            rows_read: row,
            rows,
        })?;
        let line = line.trim_end_matches('\r');

        let found = line.split(',').count();
        if found != cols {
            return Err(FormatError::RowLength {
                matrix,
                row,
                expected: cols,
                found,
            }
            .into());
        }
        for (slot, text) in staged.row_mut(row).iter_mut().zip(line.split(',')) {
            *slot = text.trim().parse().map_err(|_| FormatError::BadValue {
                matrix,
                row,
                text: text.to_string(),
            })?;
        }
    }
    Ok(staged)
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let (rows, cols) = line.trim().split_once(',')?;
    Some((rows.trim().parse().ok()?, cols.trim().parse().ok()?))
}

/// `Lines` that also reports 1-based line numbers.
struct NumberedLines<R> {
    inner: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(inner: Lines<R>) -> Self {
        NumberedLines { inner, line_no: 0 }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        match self.inner.next() {
            Some(Ok(line)) => {
                self.line_no += 1;
                Ok(Some((self.line_no, line)))
            }
            Some(Err(e)) => Err(Error::io("<model>", e)),
            None => Ok(None),
        }
    }
}
