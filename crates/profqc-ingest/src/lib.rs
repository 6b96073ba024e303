pub mod error;
pub mod export;
pub mod feedback;
pub mod measurements;
pub mod reader;

pub use error::{LoadError, Result};
pub use export::{table_to_frame, text_frame, write_frame, write_measurements, write_text_table};
pub use feedback::{feedback_from_frame, load_feedback};
pub use measurements::{load_measurements, measurements_from_frame, pad_serno};
pub use reader::{delimiter_for, read_frame};
