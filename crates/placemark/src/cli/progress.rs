//! Progress bars for long conversions.
//!
//! Everything here returns a hidden bar in quiet or JSON mode, so callers
//! never need to branch.

use super::output;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str = "  {spinner:.cyan} {msg:<24} [{bar:30.cyan/blue}] {pos}/{len}";
const TICK_CHARS: &str = "\u{25b8}\u{25b9}\u{25b8}\u{25b9}\u{25b8}";

fn hidden() -> bool {
    output::is_quiet() || output::is_json()
}

/// Bar counting `len` items (rows of one CSV, or CSV files of an archive).
pub fn create_bar(len: usize, message: &str) -> ProgressBar {
    if hidden() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.tick_chars(TICK_CHARS).progress_chars("=> "));
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Finish and clear, leaving room for the summary line.
pub fn finish(bar: &ProgressBar) {
    bar.finish_and_clear();
}
