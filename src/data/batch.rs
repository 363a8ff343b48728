use crate::data::record::{Record, CLASSES, PIXELS};
use crate::math::Matrix;

/// Maps a raw byte to `(0.001, 1.0]` so the sigmoid never sees exact 0/1
/// inputs.
pub fn normalize_pixel(value: u8) -> f32 {
    (f64::from(value) * 0.999 / 255.0 + 0.001) as f32
}

/// Input matrix (one normalised row per record, `PIXELS` columns).
pub fn inputs(records: &[Record]) -> Matrix {
    let mut data = Vec::with_capacity(records.len() * PIXELS);
    for record in records {
        data.extend(record.pixels().iter().map(|&p| normalize_pixel(p)));
    }
    Matrix::from_vec(records.len(), PIXELS, data)
}

/// One-hot target matrix (`CLASSES` columns).
pub fn targets(records: &[Record]) -> Matrix {
    let mut m = Matrix::zeros(records.len(), CLASSES);
    for (i, record) in records.iter().enumerate() {
        m[(i, usize::from(record.label()))] = 1.0;
    }
    m
}
