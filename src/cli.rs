//! clap-based command line interface.
//!
//! Defines the [`Cli`] struct with subcommands [`Command`] (new, apply,
//! actions, demo) and the global `--verbose` flag. Action payloads arrive as
//! flags on the `apply` sub-subcommands and are converted into engine
//! [`Action`]s; blank flags are passed through so the engine's field
//! validation can report them individually.

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::engine::{
    Action, AfterSaleType, EngineError, NegotiationForm, ProofForm, RefundDecision, RejectForm,
};
use crate::engine::validate::{Field, FieldErrors};

/// redress — after-sale ticket status engine.
#[derive(Debug, Parser)]
#[command(name = "redress", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable detailed output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// After-sale type accepted by the CLI, mapped to [`AfterSaleType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    /// Money back, no goods movement.
    RefundOnly,
    /// Buyer ships the item back, then gets refunded.
    ReturnAndRefund,
    /// Item swapped for a replacement.
    Exchange,
}

impl From<TypeArg> for AfterSaleType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::RefundOnly => AfterSaleType::RefundOnly,
            TypeArg::ReturnAndRefund => AfterSaleType::ReturnAndRefund,
            TypeArg::Exchange => AfterSaleType::Exchange,
        }
    }
}

/// Refund mode for the approve action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Full,
    Partial,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new ticket and write it to a JSON file.
    New {
        /// Destination ticket file.
        #[arg(long)]
        file: String,

        /// After-sale type the buyer requested.
        #[arg(long, value_enum)]
        kind: TypeArg,

        /// Mark the order as cash-on-delivery.
        #[arg(long, default_value_t = false)]
        cod: bool,

        /// Maximum refundable amount, e.g. 199.00.
        #[arg(long)]
        amount: String,
    },

    /// Apply an action to the ticket in the given file.
    Apply {
        /// Ticket file produced by `new`.
        #[arg(long)]
        file: String,

        /// Write the updated ticket back instead of printing it.
        #[arg(long, default_value_t = false)]
        write: bool,

        #[command(subcommand)]
        action: ActionCommand,
    },

    /// List the actions available in the ticket's current status.
    Actions {
        /// Ticket file produced by `new`.
        #[arg(long)]
        file: String,
    },

    /// Run the built-in lifecycle demonstration.
    Demo,
}

/// One actor action with its payload flags.
#[derive(Debug, Subcommand)]
pub enum ActionCommand {
    /// Approve the after-sale request.
    Approve {
        #[arg(long, value_enum, default_value_t = ModeArg::Full)]
        mode: ModeArg,

        /// Refund amount, required when --mode partial.
        #[arg(long)]
        amount: Option<String>,
    },

    /// Reject the after-sale request.
    Reject {
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long, default_value = "")]
        detail: String,
    },

    /// Send the buyer a negotiation proposal.
    Negotiate {
        #[arg(long, default_value = "")]
        kind: String,
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Confirm the returned parcel was received.
    ConfirmReceipt,

    /// Refuse the returned parcel and escalate to arbitration.
    RejectReceipt {
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Upload refund or arbitration proof.
    UploadProof {
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        contact: String,
    },

    /// Escalate a cash-on-delivery case to platform arbitration.
    RequestArbitration,

    /// Fire the review-window expiry (normally timer-driven).
    Expire,
}

impl ActionCommand {
    /// Convert the parsed flags into an engine action.
    ///
    /// An unparseable partial amount is reported the same way the engine
    /// reports an out-of-range one, so the shell highlights a single field
    /// either way.
    pub fn into_action(self) -> Result<Action, EngineError> {
        match self {
            ActionCommand::Approve { mode: ModeArg::Full, .. } => {
                Ok(Action::Approve(RefundDecision::Full))
            }
            ActionCommand::Approve { mode: ModeArg::Partial, amount } => {
                let amount = amount
                    .as_deref()
                    .map(str::parse::<Decimal>)
                    .transpose()
                    .map_err(|_| FieldErrors::single(Field::RefundAmount))?
                    .ok_or_else(|| FieldErrors::single(Field::RefundAmount))?;
                Ok(Action::Approve(RefundDecision::Partial { amount }))
            }
            ActionCommand::Reject { reason, detail } => {
                Ok(Action::Reject(RejectForm { reason, detail }))
            }
            ActionCommand::Negotiate { kind, content } => {
                Ok(Action::Negotiate(NegotiationForm { kind, content }))
            }
            ActionCommand::ConfirmReceipt => Ok(Action::ConfirmReceipt),
            ActionCommand::RejectReceipt { reason } => Ok(Action::RejectReceipt { reason }),
            ActionCommand::UploadProof { description, contact } => {
                Ok(Action::UploadProof(ProofForm { description, contact }))
            }
            ActionCommand::RequestArbitration => Ok(Action::RequestArbitration),
            ActionCommand::Expire => Ok(Action::CountdownExpiry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_new_subcommand() {
        let cli = Cli::parse_from([
            "redress", "new", "--file", "t.json", "--kind", "refund-only", "--cod", "--amount",
            "199.00",
        ]);
        match cli.command {
            Command::New { file, kind, cod, amount } => {
                assert_eq!(file, "t.json");
                assert!(matches!(kind, TypeArg::RefundOnly));
                assert!(cod);
                assert_eq!(amount, "199.00");
            }
            _ => panic!("expected New command"),
        }
    }

    #[test]
    fn cli_parses_apply_with_action_flags() {
        let cli = Cli::parse_from([
            "redress", "apply", "--file", "t.json", "reject", "--reason", "out of window",
            "--detail", "opened 45 days ago",
        ]);
        match cli.command {
            Command::Apply { file, write, action } => {
                assert_eq!(file, "t.json");
                assert!(!write);
                match action {
                    ActionCommand::Reject { reason, detail } => {
                        assert_eq!(reason, "out of window");
                        assert_eq!(detail, "opened 45 days ago");
                    }
                    _ => panic!("expected Reject action"),
                }
            }
            _ => panic!("expected Apply command"),
        }
    }

    #[test]
    fn cli_parses_global_verbose() {
        let cli = Cli::parse_from(["redress", "--verbose", "demo"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Demo));
    }

    #[test]
    fn approve_defaults_to_full_refund() {
        let cli = Cli::parse_from(["redress", "apply", "--file", "t.json", "approve"]);
        let Command::Apply { action, .. } = cli.command else {
            panic!("expected Apply command");
        };
        let action = action.into_action().unwrap();
        assert_eq!(action, Action::Approve(RefundDecision::Full));
    }

    #[test]
    fn partial_approve_parses_the_amount() {
        let cli = Cli::parse_from([
            "redress", "apply", "--file", "t.json", "approve", "--mode", "partial", "--amount",
            "50.00",
        ]);
        let Command::Apply { action, .. } = cli.command else {
            panic!("expected Apply command");
        };
        let action = action.into_action().unwrap();
        assert_eq!(
            action,
            Action::Approve(RefundDecision::Partial { amount: Decimal::new(5000, 2) })
        );
    }

    #[test]
    fn partial_approve_flags_a_bad_amount() {
        for amount in [Some("not-a-number"), None] {
            let cmd = ActionCommand::Approve {
                mode: ModeArg::Partial,
                amount: amount.map(str::to_string),
            };
            let err = cmd.into_action().unwrap_err();
            match err {
                EngineError::ValidationFailed(fields) => {
                    assert_eq!(fields.fields(), &[Field::RefundAmount]);
                }
                other => panic!("expected ValidationFailed, got {other:?}"),
            }
        }
    }

    #[test]
    fn expire_maps_to_countdown_expiry() {
        let cmd = ActionCommand::Expire;
        assert_eq!(cmd.into_action().unwrap(), Action::CountdownExpiry);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
