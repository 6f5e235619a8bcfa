pub mod countdown;
mod state;
mod ticket;
pub mod validate;

pub use countdown::{Clock, Countdown, SystemClock, TimerHandle};
pub use state::{Action, ActionKind, Effect, EngineError, Status, StatusEngine, TransitionResult};
pub use ticket::{AfterSaleType, NegotiationForm, ProofForm, RefundDecision, RejectForm, Ticket};
