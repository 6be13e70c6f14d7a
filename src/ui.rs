//! Terminal output for chain runs: a spinner plus colored status lines.
//!
//! [`ChainProgress`] is passed as the chain argument, so the example jobs
//! report through it while the executor drives them.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::jobs::Progress;
use crate::state_machine::{ChainReport, JobState};

/// Spinner and styled output for one chain run.
pub struct ChainProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
}

impl ChainProgress {
    /// Start a spinner titled `title`.
    pub fn start(title: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(title.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self::with_bar(pb)
    }

    /// Progress that draws nothing.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(pb: ProgressBar) -> Self {
        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    fn state_style(&self, state: JobState) -> &Style {
        match state {
            JobState::Success => &self.green,
            JobState::Error => &self.red,
            JobState::Cancel | JobState::Retry => &self.yellow,
            JobState::Start | JobState::Busy => &self.dim,
        }
    }

    /// Stop the spinner and print how the run ended.
    pub fn complete(&self, report: &ChainReport) {
        self.pb.finish_and_clear();
        let style = self.state_style(report.entry_state);
        if report.completed {
            println!(
                "  {} chain drained after {} dispatches, entry {}",
                self.green.apply_to("✓"),
                report.dispatches.len(),
                style.apply_to(report.entry_state)
            );
        } else {
            println!(
                "  {} chain abandoned after {} dispatches, entry {}",
                self.red.apply_to("✗"),
                report.dispatches.len(),
                style.apply_to(report.entry_state)
            );
        }
    }

    /// Print the dispatch report as JSON.
    pub fn print_report(&self, report: &ChainReport) {
        let style = if report.completed { &self.green } else { &self.red };
        println!();
        println!("{}", style.apply_to("─── Chain Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}

impl Progress for ChainProgress {
    fn started(&self, job: &str) {
        self.pb.println(format!("{job}: start"));
    }

    fn ticked(&self, job: &str, count: i32) {
        self.pb.println(format!("{job}: busy: {count}"));
        self.pb.set_message(format!("{job}: {count}"));
    }

    fn retrying(&self, job: &str, attempt: u32, max: u32) {
        self.pb.println(format!(
            "{job}: {} retry {attempt}/{max}",
            self.yellow.apply_to("↻")
        ));
    }

    fn finished(&self, job: &str, state: JobState) {
        let word = state.to_string().to_lowercase();
        self.pb
            .println(format!("{job}: {}", self.state_style(state).apply_to(word)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::Counter;
    use crate::state_machine::Chain;

    #[test]
    fn hidden_progress_drives_a_chain() {
        let progress = ChainProgress::hidden();
        let mut chain = Chain::new(Counter::new("c", 8).then(Counter::new("d", 9)));
        let report = chain.execute_traced(&progress, None);

        assert!(report.completed);
        assert_eq!(report.nodes, 2);
        progress.complete(&report);
    }

    #[test]
    fn spinner_progress_starts_and_completes() {
        let progress = ChainProgress::start("spinner");
        let mut chain = Chain::new(Counter::new("c", 9));
        let report = chain.execute_traced(&progress, None);

        assert!(report.completed);
        progress.complete(&report);
    }

    #[test]
    fn state_styles_cover_every_state() {
        let progress = ChainProgress::hidden();
        for state in JobState::ALL {
            let _ = progress.state_style(state).apply_to(state).to_string();
        }
    }
}
