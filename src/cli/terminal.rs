use comfy_table::Cell;
use indicatif::{MultiProgress, ProgressBar};
use std::time::Duration;

use super::{chart, ui};
use crate::client::compute::{ConversionOutcome, RateRow};
use crate::client::view::View;
use crate::core::rates::TrendSeries;

const BANNER_TTL: Duration = Duration::from_secs(5);
const CHART_HEIGHT: usize = 8;

/// Renders client output on the terminal.
pub struct TerminalView {
    progress: MultiProgress,
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        TerminalView {
            progress: MultiProgress::new(),
            spinner: None,
            interactive: console::Term::stderr().is_term(),
        }
    }

    fn emit(&self, text: &str) {
        self.progress.suspend(|| println!("{text}"));
    }
}

impl View for TerminalView {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            if self.spinner.is_none() && self.interactive {
                self.spinner = Some(self.progress.add(ui::new_spinner("Loading...")));
            }
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_error(&mut self, message: &str) {
        let handle = tokio::runtime::Handle::try_current();
        match handle {
            Ok(handle) if self.interactive => {
                let banner = self.progress.add(ui::new_banner(message));
                banner.tick();
                handle.spawn(async move {
                    tokio::time::sleep(BANNER_TTL).await;
                    banner.finish_and_clear();
                });
            }
            _ => eprintln!("{}", ui::style_text(message, ui::StyleType::Error)),
        }
    }

    fn show_currencies(&mut self, currencies: &[String], from: &str, to: &str, base: &str) {
        self.emit(&ui::style_text(
            &format!("{} currencies: {}", currencies.len(), currencies.join(", ")),
            ui::StyleType::Subtle,
        ));
        self.emit(&format!(
            "{} {from}  {} {to}  {} {base}",
            ui::style_text("From:", ui::StyleType::Label),
            ui::style_text("To:", ui::StyleType::Label),
            ui::style_text("Base:", ui::StyleType::Label),
        ));
    }

    fn show_base(&mut self, base: &str) {
        self.emit(&format!(
            "\n{}",
            ui::style_text(&format!("Exchange rates for 1 {base}"), ui::StyleType::Title)
        ));
    }

    fn show_rates(&mut self, base: &str, rows: &[RateRow], status: &str) {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate ({base})")),
        ]);
        for row in rows {
            table.add_row(vec![
                Cell::new(&row.currency),
                ui::number_cell(row.formatted_rate()),
            ]);
        }
        self.emit(&format!(
            "{table}\n{}",
            ui::style_text(status, ui::StyleType::Subtle)
        ));
    }

    fn show_trend(&mut self, series: &TrendSeries) {
        self.emit(&format!(
            "\n{}\n{}",
            ui::style_text(
                &format!("{} Exchange Rate Trend", series.base),
                ui::StyleType::Title
            ),
            chart::render_trend(series, CHART_HEIGHT)
        ));
    }

    fn show_conversion(&mut self, outcome: &ConversionOutcome) {
        let mut text = ui::style_text(&outcome.to_string(), ui::StyleType::Result);
        if let Some((forward, inverse)) = outcome.unit_rates() {
            text.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("{forward}  |  {inverse}"), ui::StyleType::Subtle)
            ));
        }
        self.emit(&text);
    }
}
