use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const MILESTONES_TEMPLATE: &str = "{spinner} {msg:15} {wide_bar:} {pos:>3}/{len:3}";

fn only_message() -> ProgressStyle {
    ProgressStyle::with_template(ONLY_MESSAGE_TEMPLATE).unwrap()
}

fn milestones_bar() -> ProgressStyle {
    ProgressStyle::with_template(MILESTONES_TEMPLATE)
        .unwrap()
        .progress_chars("#>-")
}

pub trait MultiProgressExt {
    /// Spinner with a single message line, for one milestone.
    fn add_spinner(&self, message: impl Into<String>) -> ProgressBar;
    /// Counter over the whole milestone list.
    fn add_milestones_bar(&self, total: usize) -> ProgressBar;
}

impl MultiProgressExt for MultiProgress {
    fn add_spinner(&self, message: impl Into<String>) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(only_message());
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    fn add_milestones_bar(&self, total: usize) -> ProgressBar {
        let pb = self.add(ProgressBar::new(total as u64));
        pb.set_style(milestones_bar());
        pb.set_message("Milestones");
        pb
    }
}
