//! Outbound application events.
//!
//! The [`PanelService`](super::service::PanelService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Frame validation
//! outcomes are deliberately absent: a dropped frame leaves no trace.

use crate::panel::{ArmState, TagId};
use crate::protocol::StatusRecord;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial arm state).
    Started(ArmState),

    /// A known tag toggled the arm state.
    ArmStateChanged {
        from: ArmState,
        to: ArmState,
        tag: TagId,
    },

    /// A complete tag frame arrived but the id is not provisioned.
    UnknownTag(TagId),

    /// The record built this cycle.
    Status(StatusRecord),
}
