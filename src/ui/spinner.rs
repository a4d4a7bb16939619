use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for a long-running git command; a hidden bar when `enabled` is false.
///
/// indicatif draws to stderr and stays silent when stderr is not a terminal.
pub fn create_spinner(message: impl Into<String>, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_hidden() {
        let spinner = create_spinner("Fetching ~/notes", false);
        assert!(spinner.is_hidden());
        spinner.finish_and_clear();
    }
}
