//! Built-in lifecycle demonstration for `redress demo`.
//!
//! Walks a set of tickets through the status engine end to end, including a
//! live countdown race with a shortened review window, so the whole flow can
//! be watched without wiring up any backend.

use anyhow::Result;
use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::config::RedressConfig;
use crate::engine::{
    Action, AfterSaleType, Countdown, NegotiationForm, ProofForm, RefundDecision, RejectForm,
    Status, StatusEngine, SystemClock, Ticket,
};
use crate::engine::countdown::review_window;
use crate::session::TicketSession;
use crate::ui::{self, TicketDisplay};

pub async fn run(config: &RedressConfig) -> Result<()> {
    let display = TicketDisplay::new();
    let mut session = TicketSession::new(SystemClock);

    refund_only_happy_path(&display, &mut session);
    validation_walkthrough(&display, &mut session);
    return_and_refund_dispute(&display, &mut session);
    cod_escalation(&display, &mut session);
    countdown_race(&display, &mut session, config).await?;

    Ok(())
}

fn demo_ticket(ty: AfterSaleType, is_cod: bool) -> Ticket {
    Ticket::new(ty, is_cod, Decimal::new(19900, 2), review_window(), chrono::Utc::now())
}

fn apply_and_render(
    display: &TicketDisplay,
    session: &mut TicketSession<SystemClock>,
    ticket: &mut Ticket,
    action: Action,
) {
    match session.apply(ticket, action) {
        Ok(outcome) => display.transition(&outcome),
        Err(err) => display.engine_error(&err),
    }
}

fn refund_only_happy_path(display: &TicketDisplay, session: &mut TicketSession<SystemClock>) {
    display.section("refund-only: approve, then upload proof");
    let mut ticket = demo_ticket(AfterSaleType::RefundOnly, false);
    display.summary(&ticket);

    apply_and_render(display, session, &mut ticket, Action::Approve(RefundDecision::Full));
    apply_and_render(display, session, &mut ticket, Action::UploadProof(ProofForm::default()));
}

fn validation_walkthrough(display: &TicketDisplay, session: &mut TicketSession<SystemClock>) {
    display.section("validation: each field is flagged on its own");
    let mut ticket = demo_ticket(AfterSaleType::RefundOnly, false);
    display.summary(&ticket);

    // Reason missing, detail present: only the reason is flagged and the
    // ticket stays in PendingReview.
    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::Reject(RejectForm { reason: String::new(), detail: "worn soles".into() }),
    );

    // Partial refund above the ceiling is refused the same way.
    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::Approve(RefundDecision::Partial { amount: Decimal::new(19901, 2) }),
    );

    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::Reject(RejectForm {
            reason: "out of return window".into(),
            detail: "order delivered 45 days ago".into(),
        }),
    );
}

fn return_and_refund_dispute(display: &TicketDisplay, session: &mut TicketSession<SystemClock>) {
    display.section("return-and-refund: parcel refused, platform steps in");
    let mut ticket = demo_ticket(AfterSaleType::ReturnAndRefund, false);
    display.summary(&ticket);

    apply_and_render(display, session, &mut ticket, Action::Approve(RefundDecision::Full));

    // The buyer shipping the item back happens outside the engine.
    ticket.status = Status::UserReturned;
    println!("  (buyer ships the item back)");

    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::RejectReceipt { reason: "returned item is damaged".into() },
    );
    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::UploadProof(ProofForm {
            description: "courier inspection report".into(),
            contact: "ops@example.com".into(),
        }),
    );
}

fn cod_escalation(display: &TicketDisplay, session: &mut TicketSession<SystemClock>) {
    display.section("cash-on-delivery: escalation and one-shot advisory");
    let mut ticket = demo_ticket(AfterSaleType::RefundOnly, true);
    display.summary(&ticket);
    display.actions(&StatusEngine::available_actions(&ticket));

    apply_and_render(display, session, &mut ticket, Action::RequestArbitration);
    apply_and_render(
        display,
        session,
        &mut ticket,
        Action::UploadProof(ProofForm {
            description: "offline refund receipt".into(),
            contact: "+86 138 0000 0000".into(),
        }),
    );
}

async fn countdown_race(
    display: &TicketDisplay,
    session: &mut TicketSession<SystemClock>,
    config: &RedressConfig,
) -> Result<()> {
    let window_secs = config.demo_window_secs;

    // Round one: nobody reviews the ticket, the timer wins.
    display.section("countdown: review window elapses, auto full refund");
    let mut ticket = Ticket::new(
        AfterSaleType::RefundOnly,
        false,
        Decimal::new(19900, 2),
        config.demo_window(),
        chrono::Utc::now(),
    );
    display.summary(&ticket);

    let deadline = ticket.countdown_deadline.expect("refund-only ticket has a deadline");
    let pb = display.countdown_bar(window_secs);
    let tick_bar = pb.clone();
    let (tx, rx) = oneshot::channel();
    let _handle = Countdown::start(
        SystemClock,
        deadline,
        config.tick(),
        move |left| ui::countdown_tick(&tick_bar, window_secs, left),
        move || {
            let _ = tx.send(());
        },
    );

    rx.await?;
    pb.finish_and_clear();
    apply_and_render(display, session, &mut ticket, Action::CountdownExpiry);

    // Round two: the operator acts first, the timer is cancelled and a
    // stale expiry is refused.
    display.section("countdown: operator approves first, timer is discarded");
    let mut ticket = Ticket::new(
        AfterSaleType::RefundOnly,
        false,
        Decimal::new(19900, 2),
        config.demo_window(),
        chrono::Utc::now(),
    );
    display.summary(&ticket);

    let deadline = ticket.countdown_deadline.expect("refund-only ticket has a deadline");
    let pb = display.countdown_bar(window_secs);
    let tick_bar = pb.clone();
    let handle = Countdown::start(
        SystemClock,
        deadline,
        config.tick(),
        move |left| ui::countdown_tick(&tick_bar, window_secs, left),
        || {},
    );

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    handle.cancel();
    pb.finish_and_clear();

    apply_and_render(display, session, &mut ticket, Action::Approve(RefundDecision::Full));
    // A late expiry no longer transitions anything.
    apply_and_render(display, session, &mut ticket, Action::CountdownExpiry);

    Ok(())
}
