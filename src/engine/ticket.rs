use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::Status;

/// What the buyer asked for when opening the case. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfterSaleType {
    /// Money back, no goods movement.
    RefundOnly,
    /// Buyer ships the item back, then gets refunded.
    ReturnAndRefund,
    /// Item swapped for a replacement.
    Exchange,
}

impl std::fmt::Display for AfterSaleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfterSaleType::RefundOnly => write!(f, "refund-only"),
            AfterSaleType::ReturnAndRefund => write!(f, "return-and-refund"),
            AfterSaleType::Exchange => write!(f, "exchange"),
        }
    }
}

/// How much to refund when approving a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundDecision {
    /// Refund the full ticket ceiling.
    Full,
    /// Refund a caller-chosen amount, bounded by the ticket ceiling.
    Partial { amount: Decimal },
}

/// Operator input backing a Reject action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectForm {
    /// Selected rejection reason.
    pub reason: String,
    /// Free-text explanation shown to the buyer.
    pub detail: String,
}

/// Operator input backing a Negotiate action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationForm {
    /// Kind of proposal (e.g. partial refund, replacement, coupon).
    pub kind: String,
    /// Free-text proposal sent to the buyer for confirmation.
    pub content: String,
}

/// Operator input backing an UploadProof action.
///
/// During arbitration both fields are required; for a plain refund the
/// upload may be empty (simulated settlement).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofForm {
    pub description: String,
    pub contact: String,
}

/// A single after-sale case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub status: Status,
    pub after_sale_type: AfterSaleType,
    /// Cash-on-delivery orders settle the refund offline before proof upload.
    pub is_cod: bool,
    /// Maximum refundable amount.
    pub amount: Decimal,
    /// Auto-refund deadline. Present only while a refund-only ticket sits in
    /// PendingReview without a review action having occurred.
    pub countdown_deadline: Option<DateTime<Utc>>,
    /// Every status the ticket has passed through, oldest first.
    pub status_history: Vec<Status>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Open a new ticket in PendingReview. Refund-only tickets get their
    /// auto-refund deadline set `review_window` from `now`.
    pub fn new(
        after_sale_type: AfterSaleType,
        is_cod: bool,
        amount: Decimal,
        review_window: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let countdown_deadline = match after_sale_type {
            AfterSaleType::RefundOnly => Some(now + review_window),
            _ => None,
        };
        Self {
            id: Uuid::new_v4().to_string(),
            status: Status::PendingReview,
            after_sale_type,
            is_cod,
            amount,
            countdown_deadline,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::countdown::review_window;

    fn ceiling() -> Decimal {
        Decimal::new(19900, 2) // 199.00
    }

    #[test]
    fn refund_only_ticket_gets_a_deadline() {
        let now = Utc::now();
        let ticket = Ticket::new(AfterSaleType::RefundOnly, false, ceiling(), review_window(), now);
        assert_eq!(ticket.status, Status::PendingReview);
        assert_eq!(ticket.countdown_deadline, Some(now + review_window()));
        assert!(ticket.status_history.is_empty());
    }

    #[test]
    fn other_types_get_no_deadline() {
        let now = Utc::now();
        for ty in [AfterSaleType::ReturnAndRefund, AfterSaleType::Exchange] {
            let ticket = Ticket::new(ty, false, ceiling(), review_window(), now);
            assert!(ticket.countdown_deadline.is_none());
        }
    }

    #[test]
    fn ticket_serialization_roundtrip() {
        let ticket = Ticket::new(
            AfterSaleType::ReturnAndRefund,
            true,
            ceiling(),
            review_window(),
            Utc::now(),
        );
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, ticket.id);
        assert_eq!(back.status, Status::PendingReview);
        assert_eq!(back.after_sale_type, AfterSaleType::ReturnAndRefund);
        assert!(back.is_cod);
        assert_eq!(back.amount, ceiling());
    }

    #[test]
    fn after_sale_type_display() {
        assert_eq!(AfterSaleType::RefundOnly.to_string(), "refund-only");
        assert_eq!(AfterSaleType::ReturnAndRefund.to_string(), "return-and-refund");
        assert_eq!(AfterSaleType::Exchange.to_string(), "exchange");
    }
}
