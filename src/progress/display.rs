//! Progress bar coordination for a reconciliation pass.

use crate::progress::StyleOptions;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::sync::Arc;

/// Coordinates the overall bar and the active transfer bar.
pub struct ProgressDisplay {
    multi: Arc<MultiProgress>,
    main: Arc<ProgressBar>,
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a display for `total_variants` variants.
    pub fn new(style_options: StyleOptions, total_variants: usize) -> Self {
        let multi = match style_options.is_enabled() {
            true => Arc::new(MultiProgress::new()),
            false => Arc::new(MultiProgress::with_draw_target(ProgressDrawTarget::hidden())),
        };

        let main = Arc::new(
            multi.add(
                style_options
                    .main()
                    .clone()
                    .to_progress_bar(total_variants as u64),
            ),
        );
        main.tick();

        Self {
            multi,
            main,
            style_options,
        }
    }

    /// Create a bar for one transfer.
    ///
    /// `position` is the resume offset so a resumed transfer starts where
    /// the previous run stopped.
    pub fn create_transfer(&self, total: u64, position: u64, label: &str) -> ProgressBar {
        let pb = self.multi.add(
            self.style_options
                .child()
                .clone()
                .to_progress_bar(total)
                .with_position(position),
        );
        pb.set_message(label.to_string());
        pb
    }

    /// Count one more reconciled variant.
    pub fn increment_main(&self) {
        self.main.inc(1);
    }

    /// Finish a transfer bar.
    pub fn finish_transfer(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Abandon a transfer bar after a failure.
    pub fn abandon_transfer(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.abandon();
        }
    }

    /// Finish the display.
    pub fn finish(self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}
