mod log_writer;
mod progress;

pub use log_writer::ProgressLogWriter;
pub use progress::MultiProgressExt;
