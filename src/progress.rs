//! Progress display for lag analysis
//!
//! A spinner while the analysed manifest is fetched, then one bar tick per
//! declared dependency. Skipped dependencies are counted in the bar message
//! and their warnings are printed with the bar hidden.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for one analysis run
pub struct Progress {
    /// Disabled in quiet and JSON modes
    enabled: bool,
    bar: Option<ProgressBar>,
    skipped: usize,
    current: String,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: None,
            skipped: 0,
            current: String::new(),
        }
    }

    /// Spinner shown while the manifest of `target` is fetched
    pub fn fetching_manifest(&mut self, target: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Fetching manifest of {}...", target));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Bar over the `total` dependencies of one group
    pub fn start_dependencies(&mut self, total: usize) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
        self.skipped = 0;
        self.current.clear();
        self.refresh();
    }

    /// Mark `name` as the dependency being analysed
    pub fn dependency(&mut self, name: &str) {
        self.current = name.to_string();
        self.refresh();
    }

    /// Count a skipped dependency and run `log` with the bar hidden
    pub fn skip<F: FnOnce()>(&mut self, log: F) {
        self.skipped += 1;
        match self.bar {
            Some(ref bar) => bar.suspend(log),
            None => log(),
        }
        self.refresh();
    }

    /// One dependency done
    pub fn advance(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }

    fn message(&self) -> String {
        let mut message = if self.current.is_empty() {
            "Analyzing dependencies".to_string()
        } else {
            format!("Analyzing {}", self.current)
        };
        if self.skipped > 0 {
            message.push_str(&format!(" ({} skipped)", self.skipped));
        }
        message
    }

    fn refresh(&self) {
        if let Some(ref bar) = self.bar {
            bar.set_message(self.message());
        }
    }
}
