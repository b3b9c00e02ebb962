/*!
 * Progress bar over input bytes consumed
 */

use indicatif::{ProgressBar, ProgressStyle};

/// Minimum input advance between two redraws
const UPDATE_STEP: u64 = 64 * 1024;

pub struct ProgressReporter {
    bar: ProgressBar,
    last_position: u64,
}

impl ProgressReporter {
    /// Create a reporter for an input of `total_bytes`; hidden when `enabled` is false
    pub fn new(total_bytes: u64, enabled: bool) -> Self {
        let bar = if enabled {
            let pb = ProgressBar::new(total_bytes);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg} ({eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            last_position: 0,
        }
    }

    /// Record input position; redraws only after `UPDATE_STEP` bytes
    pub fn update(&mut self, bytes_read: u64, lines: u64) {
        if bytes_read.saturating_sub(self.last_position) < UPDATE_STEP {
            return;
        }
        self.last_position = bytes_read;
        self.bar.set_position(bytes_read);
        self.bar.set_message(format!("{} lines", lines));
    }

    pub fn finish(&self, bytes_read: u64, lines: u64) {
        self.bar.set_position(bytes_read);
        self.bar.finish_with_message(format!("{} lines", lines));
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }

    pub fn position(&self) -> u64 {
        self.last_position
    }
}
