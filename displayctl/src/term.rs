//! Terminal rendition of the console's upload dialog: an indicatif bar for
//! the progress element, colored lines for toasts.

use std::sync::Arc;
use std::time::Instant;

use colored::*;
use display_core::notify::{Toast, ToastRack};
use display_core::upload::{ConsoleUi, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};

pub struct TermUi {
    bar: Option<ProgressBar>,
    toasts: ToastRack,
    failed: bool,
}

impl TermUi {
    pub fn new() -> Self {
        Self {
            bar: None,
            toasts: ToastRack::default(),
            failed: false,
        }
    }

    fn bar_style(failed: bool) -> ProgressStyle {
        let template = if failed {
            "{spinner:.red} [{bar:40.red}] {pos}%"
        } else {
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}%"
        };
        ProgressStyle::default_bar()
            .template(template)
            .unwrap()
            .progress_chars("#>-")
    }
}

impl ConsoleUi for TermUi {
    fn open_dialog(&mut self) {
        let bar = ProgressBar::new(100);
        bar.set_style(Self::bar_style(false));
        bar.set_position(0);
        self.bar = Some(bar);
    }

    fn progress_sink(&self) -> ProgressSink {
        match &self.bar {
            Some(bar) => {
                let bar = bar.clone();
                Arc::new(move |pct| bar.set_position(pct as u64))
            }
            None => Arc::new(|_| {}),
        }
    }

    fn set_progress(&mut self, percent: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(percent as u64);
        }
    }

    fn mark_failed(&mut self) {
        self.failed = true;
        if let Some(bar) = &self.bar {
            bar.set_style(Self::bar_style(true));
        }
    }

    fn toast(&mut self, title: &str, body: &str) {
        self.toasts.push(Toast::new(title, body));
    }

    fn reload(&mut self) {
        println!("{} Upload complete", "✅".green());
    }

    fn dismiss(&mut self) {
        if let Some(bar) = self.bar.take() {
            if self.failed {
                // leave the red bar on screen next to the error output
                bar.abandon();
            } else {
                bar.finish_and_clear();
            }
        }
        // render pending toasts below the dismissed dialog
        let mut toasts = std::mem::take(&mut self.toasts);
        toasts.sweep(Instant::now());
        for toast in toasts.iter() {
            eprintln!("{} {}", toast.title.red().bold(), toast.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use display_core::upload::ConsoleUi;

    #[test]
    fn test_toasts_are_held_until_dismissal() {
        let mut ui = TermUi::new();
        ui.open_dialog();
        ui.toast("Upload failed", "bad image");
        ui.toast("Upload failed", "worse image");
        assert_eq!(ui.toasts.len(), 2);

        ui.dismiss();
        assert!(ui.toasts.is_empty());
    }

    #[test]
    fn test_toast_text_is_sanitized() {
        let mut ui = TermUi::new();
        ui.toast("Upload failed", "\u{1b}[2Jbad image");
        let bodies: Vec<&str> = ui.toasts.iter().map(|t| t.body.as_str()).collect();
        assert_eq!(bodies, vec!["bad image"]);
    }
}
