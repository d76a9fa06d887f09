//! Step headers and progress bars for the extract command

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

const ENTRY_BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos}/{len} entries";

/// `[1/2] 📦 Reading archive directory...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Bar counting entries walked in directory order.
#[must_use]
pub fn entry_bar(total: u64, msg: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(ENTRY_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(total);
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb
}
