//! Terminal rendering: colored transition banners and the countdown bar.
//!
//! Uses the `console` crate for styled output and `indicatif` for the
//! live countdown display. The engine knows nothing about any of this; it
//! only ever sees effect descriptors.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::engine::countdown::format_remaining;
use crate::engine::validate::FieldErrors;
use crate::engine::{ActionKind, EngineError, Ticket};
use crate::session::Outcome;

/// Styled terminal output for one operator session.
pub struct TicketDisplay {
    // Green for committed transitions.
    green: Style,
    // Red for refused actions and failed fields.
    red: Style,
    // Yellow for advisories.
    yellow: Style,
    // Cyan for structural labels.
    cyan: Style,
}

impl Default for TicketDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketDisplay {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            cyan: Style::new().cyan(),
        }
    }

    /// One-line ticket summary.
    pub fn summary(&self, ticket: &Ticket) {
        let cod = if ticket.is_cod { " [COD]" } else { "" };
        println!(
            "{} {} {} ({}, ceiling {}{})",
            self.cyan.apply_to("ticket"),
            ticket.id,
            ticket.status,
            ticket.after_sale_type,
            ticket.amount,
            cod,
        );
        if let Some(deadline) = ticket.countdown_deadline {
            println!(
                "  {} auto full refund at {}",
                self.yellow.apply_to("deadline"),
                deadline.to_rfc3339()
            );
        }
    }

    /// Render a committed transition and its notices.
    pub fn transition(&self, outcome: &Outcome) {
        println!(
            "  {} {} -> {}",
            self.green.apply_to("✓"),
            outcome.result.from,
            outcome.result.to
        );
        for notice in &outcome.notices {
            println!("    {} {notice}", self.yellow.apply_to("·"));
        }
    }

    /// Render a refused action; field errors are listed one per line.
    pub fn engine_error(&self, err: &EngineError) {
        match err {
            EngineError::InvalidTransition { status, action } => {
                println!(
                    "  {} {action} is not available while the ticket is {status}",
                    self.red.apply_to("✗")
                );
            }
            EngineError::ValidationFailed(fields) => {
                println!("  {} fix the highlighted fields:", self.red.apply_to("✗"));
                self.field_errors(fields);
            }
        }
    }

    pub fn field_errors(&self, fields: &FieldErrors) {
        for field in fields.fields() {
            println!("    {} {field}", self.red.apply_to("!"));
        }
    }

    /// List the actions the operator may take.
    pub fn actions(&self, actions: &[ActionKind]) {
        if actions.is_empty() {
            println!("  (no actions available)");
            return;
        }
        for action in actions {
            println!("  {} {action}", self.cyan.apply_to("•"));
        }
    }

    /// Section header for the demo walkthrough.
    pub fn section(&self, title: &str) {
        println!();
        println!("{}", self.cyan.apply_to(format!("─── {title} ───")));
    }

    /// Live countdown bar sized to the review window in seconds.
    pub fn countdown_bar(&self, window_secs: u64) -> ProgressBar {
        let pb = ProgressBar::new(window_secs);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/blue} {msg}")
                .expect("invalid template"),
        );
        pb
    }
}

/// Update a countdown bar from the time left. Free function so the timer
/// task can call it without borrowing the display.
pub fn countdown_tick(pb: &ProgressBar, window_secs: u64, left: chrono::Duration) {
    let left_secs = left.num_seconds().max(0) as u64;
    pb.set_position(window_secs.saturating_sub(left_secs));
    pb.set_message(format!("auto refund in {}", format_remaining(left)));
}
