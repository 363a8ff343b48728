pub mod batch;
pub mod record;
pub mod store;

pub use record::{Record, CLASSES, IMAGE_SIDE, PIXELS};
pub use store::{RecordStore, MAX_RECORD_HINT};
