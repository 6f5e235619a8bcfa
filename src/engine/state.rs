use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ticket::{AfterSaleType, NegotiationForm, ProofForm, RefundDecision, RejectForm, Ticket};
use super::validate::{self, FieldErrors};

/// Lifecycle states of an after-sale ticket.
///
/// Succeeded and Closed are terminal. PendingMerchantShipment is the handoff
/// point for approved exchanges; the downstream fulfillment flow is owned by
/// another system and defines its own transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    PendingReview,
    PendingUserReturn,
    UserReturned,
    PendingRefund,
    PlatformArbitration,
    PendingUserConfirmation,
    PendingMerchantShipment,
    Succeeded,
    Closed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::PendingReview => write!(f, "PENDING_REVIEW"),
            Status::PendingUserReturn => write!(f, "PENDING_USER_RETURN"),
            Status::UserReturned => write!(f, "USER_RETURNED"),
            Status::PendingRefund => write!(f, "PENDING_REFUND"),
            Status::PlatformArbitration => write!(f, "PLATFORM_ARBITRATION"),
            Status::PendingUserConfirmation => write!(f, "PENDING_USER_CONFIRMATION"),
            Status::PendingMerchantShipment => write!(f, "PENDING_MERCHANT_SHIPMENT"),
            Status::Succeeded => write!(f, "SUCCEEDED"),
            Status::Closed => write!(f, "CLOSED"),
        }
    }
}

/// An actor action together with its form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Approve(RefundDecision),
    Reject(RejectForm),
    Negotiate(NegotiationForm),
    ConfirmReceipt,
    RejectReceipt { reason: String },
    UploadProof(ProofForm),
    /// COD escalation from the reject flow.
    RequestArbitration,
    /// Fired by the countdown timer, never by the operator.
    CountdownExpiry,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Approve(_) => ActionKind::Approve,
            Action::Reject(_) => ActionKind::Reject,
            Action::Negotiate(_) => ActionKind::Negotiate,
            Action::ConfirmReceipt => ActionKind::ConfirmReceipt,
            Action::RejectReceipt { .. } => ActionKind::RejectReceipt,
            Action::UploadProof(_) => ActionKind::UploadProof,
            Action::RequestArbitration => ActionKind::RequestArbitration,
            Action::CountdownExpiry => ActionKind::CountdownExpiry,
        }
    }
}

/// Payload-free action discriminant, used for reporting and for the
/// declarative available-actions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Approve,
    Reject,
    Negotiate,
    ConfirmReceipt,
    RejectReceipt,
    UploadProof,
    RequestArbitration,
    CountdownExpiry,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::Negotiate => "negotiate",
            ActionKind::ConfirmReceipt => "confirm-receipt",
            ActionKind::RejectReceipt => "reject-receipt",
            ActionKind::UploadProof => "upload-proof",
            ActionKind::RequestArbitration => "request-arbitration",
            ActionKind::CountdownExpiry => "countdown-expiry",
        };
        write!(f, "{name}")
    }
}

/// Side effects a committed transition asks the shell to carry out.
/// The engine performs no I/O itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Plain operator-facing message.
    Notify { message: String },
    /// Message shown at most once per key per session (COD advisory).
    NotifyOnce { key: String, message: String },
    /// Persist the rejection reason on the case record.
    RecordRejection { reason: String, detail: String },
    /// Send the negotiation proposal to the buyer for confirmation.
    RecordProposal { kind: String, content: String },
    /// Review window elapsed; issue the full refund without operator input.
    AutoFullRefund { amount: Decimal },
    /// Hand the case to platform arbitration.
    SubmitArbitration { reason: String },
}

/// A committed state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub from: Status,
    pub to: Status,
    pub effects: Vec<Effect>,
}

/// Why an action was refused. The ticket is never modified on error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("action {action} is not valid while the ticket is {status}")]
    InvalidTransition { status: Status, action: ActionKind },

    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),
}

impl From<FieldErrors> for EngineError {
    fn from(errors: FieldErrors) -> Self {
        EngineError::ValidationFailed(errors)
    }
}

const COD_NOTICE: &str =
    "cash-on-delivery order: settle the refund offline, then upload the refund proof";

/// Drives a `Ticket` through its lifecycle.
pub struct StatusEngine;

impl StatusEngine {
    /// Apply one action to the ticket at the given instant.
    ///
    /// Commits atomically: either the ticket takes the new status and the
    /// side-effect descriptors are returned, or an error is returned and the
    /// ticket is left untouched. The auto-refund deadline is cleared on every
    /// transition out of PendingReview.
    pub fn apply(
        ticket: &mut Ticket,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<TransitionResult, EngineError> {
        let (next, mut effects) = Self::evaluate(ticket, action, now)?;

        let from = ticket.status;
        ticket.status_history.push(from);
        ticket.status = next;
        ticket.countdown_deadline = None;
        ticket.updated_at = now;

        // Offline settlement advisory, surfaced once per ticket per session.
        if ticket.is_cod && matches!(next, Status::PendingRefund | Status::PlatformArbitration) {
            effects.push(Effect::NotifyOnce {
                key: format!("cod:{}", ticket.id),
                message: COD_NOTICE.to_string(),
            });
        }

        Ok(TransitionResult { from, to: next, effects })
    }

    /// Actions the operator can take in the ticket's current state.
    /// CountdownExpiry is timer-driven and never listed.
    pub fn available_actions(ticket: &Ticket) -> Vec<ActionKind> {
        match ticket.status {
            Status::PendingReview => {
                let mut actions =
                    vec![ActionKind::Approve, ActionKind::Reject, ActionKind::Negotiate];
                if ticket.is_cod {
                    actions.push(ActionKind::RequestArbitration);
                }
                actions
            }
            Status::PendingUserReturn => vec![ActionKind::Negotiate],
            Status::UserReturned => vec![ActionKind::ConfirmReceipt, ActionKind::RejectReceipt],
            Status::PendingRefund | Status::PlatformArbitration => vec![ActionKind::UploadProof],
            Status::PendingUserConfirmation
            | Status::PendingMerchantShipment
            | Status::Succeeded
            | Status::Closed => Vec::new(),
        }
    }

    /// Evaluate without mutating. Returns the target status and the domain
    /// effects for the transition.
    fn evaluate(
        ticket: &Ticket,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<(Status, Vec<Effect>), EngineError> {
        let kind = action.kind();
        match (ticket.status, action) {
            (Status::PendingReview, Action::Approve(decision)) => {
                // Exchanges carry no refund amount, so the bound check only
                // applies to the refundable types.
                if ticket.after_sale_type != AfterSaleType::Exchange {
                    validate::refund_decision(&decision, ticket.amount)?;
                }
                match ticket.after_sale_type {
                    AfterSaleType::RefundOnly => Ok((
                        Status::PendingRefund,
                        vec![notify("refund approved, awaiting refund processing")],
                    )),
                    AfterSaleType::ReturnAndRefund => Ok((
                        Status::PendingUserReturn,
                        vec![notify("return approved, waiting for the buyer to ship the item back")],
                    )),
                    AfterSaleType::Exchange => Ok((
                        Status::PendingMerchantShipment,
                        vec![notify("exchange approved, prepare the replacement shipment")],
                    )),
                }
            }

            (Status::PendingReview, Action::Reject(form)) => {
                validate::reject(&form)?;
                Ok((
                    Status::Closed,
                    vec![Effect::RecordRejection { reason: form.reason, detail: form.detail }],
                ))
            }

            (Status::PendingReview | Status::PendingUserReturn, Action::Negotiate(form)) => {
                validate::negotiation(&form)?;
                Ok((
                    Status::PendingUserConfirmation,
                    vec![Effect::RecordProposal { kind: form.kind, content: form.content }],
                ))
            }

            (Status::PendingReview, Action::RequestArbitration) if ticket.is_cod => Ok((
                Status::PlatformArbitration,
                vec![Effect::SubmitArbitration {
                    reason: "cash-on-delivery escalation".to_string(),
                }],
            )),

            (Status::PendingReview, Action::CountdownExpiry) => match ticket.countdown_deadline {
                Some(deadline)
                    if ticket.after_sale_type == AfterSaleType::RefundOnly && now >= deadline =>
                {
                    Ok((
                        Status::PendingRefund,
                        vec![Effect::AutoFullRefund { amount: ticket.amount }],
                    ))
                }
                _ => Err(EngineError::InvalidTransition { status: ticket.status, action: kind }),
            },

            (Status::UserReturned, Action::ConfirmReceipt) => Ok((
                Status::PendingRefund,
                vec![notify("receipt confirmed, awaiting refund processing")],
            )),

            (Status::UserReturned, Action::RejectReceipt { reason }) => {
                validate::receipt_reason(&reason)?;
                Ok((
                    Status::PlatformArbitration,
                    vec![Effect::SubmitArbitration { reason }],
                ))
            }

            // Plain refund proof may be empty (simulated settlement).
            (Status::PendingRefund, Action::UploadProof(_)) => Ok((
                Status::Succeeded,
                vec![notify("refund proof uploaded, case completed")],
            )),

            (Status::PlatformArbitration, Action::UploadProof(form)) => {
                validate::arbitration_proof(&form)?;
                Ok((
                    Status::Succeeded,
                    vec![notify("arbitration proof uploaded, case completed")],
                ))
            }

            _ => Err(EngineError::InvalidTransition { status: ticket.status, action: kind }),
        }
    }
}

fn notify(message: &str) -> Effect {
    Effect::Notify { message: message.to_string() }
}
