//! Shell-side driver for the status engine.
//!
//! [`TicketSession`] owns what the engine deliberately does not: the clock
//! used for deadline comparisons and the set of one-shot notice keys already
//! surfaced this session. The engine stays a pure function of
//! (ticket, action, now).

use std::collections::HashSet;

use crate::engine::{Action, Clock, Effect, EngineError, StatusEngine, Ticket, TransitionResult};

/// A committed transition rendered for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub result: TransitionResult,
    /// Operator-facing messages, one-shot notices already deduplicated.
    pub notices: Vec<String>,
}

/// Drives tickets through the engine for one operator session.
pub struct TicketSession<C: Clock> {
    clock: C,
    /// Keys of one-shot notices already shown this session.
    notified: HashSet<String>,
}

impl<C: Clock> TicketSession<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, notified: HashSet::new() }
    }

    /// Apply one action and translate the effect descriptors into notices.
    pub fn apply(&mut self, ticket: &mut Ticket, action: Action) -> Result<Outcome, EngineError> {
        let result = StatusEngine::apply(ticket, action, self.clock.now())?;

        let mut notices = Vec::new();
        for effect in &result.effects {
            match effect {
                Effect::Notify { message } => notices.push(message.clone()),
                Effect::NotifyOnce { key, message } => {
                    if self.notified.insert(key.clone()) {
                        notices.push(message.clone());
                    }
                }
                Effect::RecordRejection { reason, detail } => {
                    notices.push(format!("after-sale rejected: {reason} ({detail})"));
                }
                Effect::RecordProposal { kind, content } => {
                    notices.push(format!("proposal sent to the buyer: {kind}: {content}"));
                }
                Effect::AutoFullRefund { amount } => {
                    notices.push(format!(
                        "review window elapsed, auto full refund of {amount} issued"
                    ));
                }
                Effect::SubmitArbitration { reason } => {
                    notices.push(format!("submitted for platform arbitration: {reason}"));
                }
            }
        }

        Ok(Outcome { result, notices })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::countdown::review_window;
    use crate::engine::{AfterSaleType, ProofForm, RefundDecision, Status};
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn cod_ticket(now: DateTime<Utc>) -> Ticket {
        Ticket::new(AfterSaleType::RefundOnly, true, Decimal::new(8800, 2), review_window(), now)
    }

    #[test]
    fn cod_notice_is_surfaced_exactly_once() {
        let now = Utc::now();
        let mut session = TicketSession::new(FixedClock(now));
        let mut ticket = cod_ticket(now);

        // Entering PendingRefund surfaces the offline settlement advisory.
        let outcome = session
            .apply(&mut ticket, Action::Approve(RefundDecision::Full))
            .unwrap();
        assert!(outcome.notices.iter().any(|n| n.contains("offline")));

        // A second ticket reuses its own key, but the same ticket re-entering
        // a COD-advisory state must stay quiet. Walk this one into
        // arbitration by hand to check.
        let mut second = cod_ticket(now);
        second.id = ticket.id.clone();
        second.status = Status::UserReturned;
        let outcome = session
            .apply(&mut second, Action::RejectReceipt { reason: "wrong item returned".into() })
            .unwrap();
        assert!(!outcome.notices.iter().any(|n| n.contains("offline")));
    }

    #[test]
    fn distinct_tickets_each_get_their_notice() {
        let now = Utc::now();
        let mut session = TicketSession::new(FixedClock(now));

        let mut first = cod_ticket(now);
        let mut second = cod_ticket(now);

        let a = session.apply(&mut first, Action::Approve(RefundDecision::Full)).unwrap();
        let b = session.apply(&mut second, Action::Approve(RefundDecision::Full)).unwrap();
        assert!(a.notices.iter().any(|n| n.contains("offline")));
        assert!(b.notices.iter().any(|n| n.contains("offline")));
    }

    #[test]
    fn auto_refund_notice_carries_the_amount() {
        let now = Utc::now();
        let expiry_instant = now + review_window();
        let mut session = TicketSession::new(FixedClock(expiry_instant));

        let mut ticket =
            Ticket::new(AfterSaleType::RefundOnly, false, Decimal::new(19900, 2), review_window(), now);
        let outcome = session.apply(&mut ticket, Action::CountdownExpiry).unwrap();

        assert_eq!(ticket.status, Status::PendingRefund);
        assert!(outcome.notices.iter().any(|n| n.contains("199.00")));
    }

    #[test]
    fn engine_errors_pass_through_unchanged() {
        let now = Utc::now();
        let mut session = TicketSession::new(FixedClock(now));
        let mut ticket = cod_ticket(now);
        ticket.status = Status::Succeeded;

        let err = session
            .apply(&mut ticket, Action::UploadProof(ProofForm::default()))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }
}
