//! Grammar tables: the pluggable layer between the TLV engine and messages
//!
//! A grammar is a static table mapping `(state, tag first octet)` to a
//! transition. The decode session walks this table as TLV headers arrive;
//! the table itself carries no runtime state, so a grammar is just a type
//! with an associated `transition` function.

use krb5_core::ProtocolResult;

use super::tlv::TlvEvent;

/// A semantic action run when a transition fires.
///
/// For `Capture` transitions the event carries the complete value bytes;
/// for `Descend` transitions the value slice is empty and only the header
/// fields are meaningful.
pub type Action<M> = for<'a> fn(&mut M, &TlvEvent<'a>) -> ProtocolResult<()>;

/// The action for transitions that only change state.
pub fn no_action<M>(_message: &mut M, _event: &TlvEvent<'_>) -> ProtocolResult<()> {
    Ok(())
}

/// How the engine treats the matched TLV's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Open a nesting frame and decode the value as further TLVs.
    Descend,
    /// Buffer the complete value and hand it to the action in one piece.
    Capture,
}

/// One edge of a grammar table.
pub struct Transition<S, M> {
    /// State the grammar moves to once the action succeeds.
    pub next: S,
    /// Whether to descend into or capture the matched TLV.
    pub flow: Flow,
    /// Whether the message may legally end after this transition.
    pub terminal: bool,
    /// Semantic action to run.
    pub action: Action<M>,
}

impl<S, M> Transition<S, M> {
    /// A transition that descends into a constructed TLV.
    pub fn descend(next: S, action: Action<M>) -> Self {
        Self {
            next,
            flow: Flow::Descend,
            terminal: false,
            action,
        }
    }

    /// A transition that captures the complete value.
    pub fn capture(next: S, action: Action<M>) -> Self {
        Self {
            next,
            flow: Flow::Capture,
            terminal: false,
            action,
        }
    }

    /// Mark the message as allowed to end after this transition.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }
}

// Derived Copy/Clone would demand M: Copy even though only the fn pointer
// is stored, so both are written out.
impl<S: Copy, M> Clone for Transition<S, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Copy, M> Copy for Transition<S, M> {}

/// A message grammar.
///
/// Implementors are zero-sized types; the whole grammar lives in the
/// `transition` match. Dispatch is on the raw first identifier octet, which
/// for the short-form tags Kerberos uses encodes class, constructed flag and
/// number in one byte. A `None` return means the tag is not acceptable in
/// the given state.
pub trait Grammar {
    /// Grammar state, a field-less enum.
    type State: Copy + PartialEq + std::fmt::Debug;
    /// The message being populated.
    type Message: Default;

    /// Grammar name used in logs and error reports.
    const NAME: &'static str;
    /// Initial state.
    const START: Self::State;

    /// Look up the transition for `tag` in `state`.
    fn transition(state: Self::State, tag: u8) -> Option<Transition<Self::State, Self::Message>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::tlv::Tag;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum ToyState {
        Start,
        Done,
    }

    #[derive(Default)]
    struct ToyMessage {
        value: Vec<u8>,
    }

    #[test]
    fn test_transition_builders() {
        let t: Transition<ToyState, ToyMessage> =
            Transition::capture(ToyState::Done, |m: &mut ToyMessage, ev| {
                m.value = ev.value.to_vec();
                Ok(())
            })
            .terminal();
        assert_eq!(t.next, ToyState::Done);
        assert_eq!(t.flow, Flow::Capture);
        assert!(t.terminal);

        let t: Transition<ToyState, ToyMessage> =
            Transition::descend(ToyState::Start, no_action);
        assert_eq!(t.flow, Flow::Descend);
        assert!(!t.terminal);
    }

    #[test]
    fn test_action_runs_against_message() {
        let t: Transition<ToyState, ToyMessage> =
            Transition::capture(ToyState::Done, |m: &mut ToyMessage, ev| {
                m.value = ev.value.to_vec();
                Ok(())
            });
        let mut message = ToyMessage::default();
        let event = TlvEvent {
            tag: Tag::short(0x04),
            length: 2,
            header_size: 2,
            start: 0,
            value: &[0xAB, 0xCD],
        };
        (t.action)(&mut message, &event).unwrap();
        assert_eq!(message.value, vec![0xAB, 0xCD]);
    }
}
