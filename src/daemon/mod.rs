mod scheduler;
mod updater;

pub use scheduler::{wait_for_shutdown, RunSummary, Scheduler, Sleeper, TokioSleeper};
pub use updater::{PassReport, Updater};
