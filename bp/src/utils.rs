use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
use std::time::Instant;

/// Progress bar that only shows up once the computation has been running for
/// `config.progress_min_time`, and is cleared when dropped.
pub(crate) struct DelayedProgress {
    min_time: Option<std::time::Duration>,
    start: Instant,
    len: u64,
    msg: &'static str,
    pb: Option<ProgressBar>,
}

impl DelayedProgress {
    pub(crate) fn new(len: u64, msg: &'static str, config: &crate::Config) -> Self {
        Self {
            min_time: config.progress_min_time(),
            start: Instant::now(),
            len,
            msg,
            pb: None,
        }
    }

    pub(crate) fn set_position(&mut self, pos: u64) {
        if self.pb.is_none() {
            match self.min_time {
                Some(min_time) if self.start.elapsed() >= min_time => {
                    // indicatif::ProgressBar does not offer a way to set the start time, so the
                    // elapsed time shown ignores the initial wait.
                    self.pb = Some(
                        ProgressBar::new(self.len)
                            .with_style(
                                ProgressStyle::default_spinner()
                                    .template(
                                        "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] ({pos}/{len}, ETA {eta})",
                                    )
                                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                            )
                            .with_finish(ProgressFinish::AndClear)
                            .with_message(self.msg),
                    );
                }
                _ => return,
            }
        }
        if let Some(pb) = &self.pb {
            pb.set_position(pos);
        }
    }
}

impl Drop for DelayedProgress {
    fn drop(&mut self) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}
