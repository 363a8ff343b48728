use std::io::Write;

use digit_trainer::data::PIXELS;
use tempfile::NamedTempFile;

/// A dataset line whose image lights one horizontal band per digit.
pub fn digit_line(label: u8) -> String {
    let band = usize::from(label) * PIXELS / 10;
    let pixels: Vec<String> = (0..PIXELS)
        .map(|i| {
            if (band..band + PIXELS / 10).contains(&i) {
                "255".to_string()
            } else {
                "0".to_string()
            }
        })
        .collect();
    format!("{},{}", label, pixels.join(","))
}

/// Writes `per_class` records of every digit, interleaved by class.
pub fn dataset_file(per_class: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..per_class {
        for label in 0..10 {
            writeln!(file, "{}", digit_line(label)).unwrap();
        }
    }
    file.flush().unwrap();
    file
}
