//! Progress bar for the per-project loop.

use indicatif::{ProgressBar, ProgressStyle};

/// A bar over `total` projects.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar() {
        let pb = create_progress_bar(12, "Parsing projects");
        assert_eq!(pb.length(), Some(12));
        pb.inc(1);
        assert_eq!(pb.position(), 1);
        pb.finish_and_clear();
    }
}
