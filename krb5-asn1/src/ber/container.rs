//! Per-decode mutable state: grammar position, frame stack, message under
//! construction
//!
//! The session owns everything one in-flight decode needs, so the byte
//! engine in `decoder` is free of per-message bookkeeping. The frame stack
//! is the length-tracking device: each open constructed value contributes
//! one counter of bytes still expected, every consumed byte decrements all
//! of them, and a counter reaching zero closes its value.

use krb5_core::{ProtocolError, ProtocolResult};

use super::decoder::Phase;
use super::grammar::{Grammar, Transition};
use super::tlv::TlvEvent;

/// A record of one grammar transition, handed to the session observer.
#[derive(Debug)]
pub struct TransitionEvent {
    /// Grammar name.
    pub grammar: &'static str,
    /// Offset of the TLV that triggered the transition.
    pub offset: usize,
    /// First identifier octet of that TLV.
    pub tag: u8,
    /// State the grammar moved to.
    pub state: String,
    /// Whether the message may end in the new state.
    pub terminal: bool,
}

type Observer = Box<dyn FnMut(&TransitionEvent)>;

/// An incremental decode in progress for grammar `G`.
///
/// Input is supplied in arbitrary-sized chunks via
/// [`feed`](DecodeSession::feed); the session suspends at any byte boundary
/// and resumes on the next chunk. [`finish`](DecodeSession::finish) yields
/// the decoded message or reports exactly how the input fell short.
pub struct DecodeSession<G: Grammar> {
    pub(crate) state: G::State,
    pub(crate) message: G::Message,
    /// Open constructed values, outermost first: the tag that opened each
    /// one and the bytes it still expects.
    pub(crate) frames: Vec<(u8, usize)>,
    /// Reassembly buffer for a value split across chunks.
    pub(crate) buffer: Vec<u8>,
    /// Absolute offset of the next input byte.
    pub(crate) offset: usize,
    pub(crate) phase: Phase<G::State, G::Message>,
    /// Whether the grammar currently allows the message to end.
    pub(crate) end_allowed: bool,
    pub(crate) complete: bool,
    observer: Option<Observer>,
}

impl<G: Grammar> DecodeSession<G> {
    pub fn new() -> Self {
        Self {
            state: G::START,
            message: G::Message::default(),
            frames: Vec::new(),
            buffer: Vec::new(),
            offset: 0,
            phase: Phase::Tag,
            end_allowed: false,
            complete: false,
            observer: None,
        }
    }

    /// Install a callback invoked after every successful transition.
    pub fn observe(&mut self, observer: impl FnMut(&TransitionEvent) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Restore the initial state so the session can decode another message.
    /// The observer, if any, is kept.
    pub fn reset(&mut self) {
        self.state = G::START;
        self.message = G::Message::default();
        self.frames.clear();
        self.buffer.clear();
        self.offset = 0;
        self.phase = Phase::Tag;
        self.end_allowed = false;
        self.complete = false;
    }

    /// Whether the grammar has reached a terminal state and every open
    /// frame has closed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Absolute offset of the next input byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Run a transition's action and commit the state change.
    pub(crate) fn apply(
        &mut self,
        transition: &Transition<G::State, G::Message>,
        event: &TlvEvent<'_>,
    ) -> ProtocolResult<()> {
        (transition.action)(&mut self.message, event)?;

        log::trace!(
            "{}: {:?} --0x{:02X}--> {:?}",
            G::NAME,
            self.state,
            event.tag.first_octet(),
            transition.next
        );

        self.state = transition.next;
        self.end_allowed = transition.terminal;

        if let Some(observer) = self.observer.as_mut() {
            observer(&TransitionEvent {
                grammar: G::NAME,
                offset: event.start,
                tag: event.tag.first_octet(),
                state: format!("{:?}", transition.next),
                terminal: transition.terminal,
            });
        }
        Ok(())
    }

    /// Account `count` consumed bytes against every open frame.
    pub(crate) fn consume(&mut self, count: usize, at: usize, tag: u8) -> ProtocolResult<()> {
        for (_, remaining) in &mut self.frames {
            *remaining = remaining
                .checked_sub(count)
                .ok_or(ProtocolError::LengthMismatch { offset: at, tag })?;
        }
        Ok(())
    }

    /// Open a nesting frame for a constructed value of `length` bytes.
    pub(crate) fn push_frame(&mut self, tag: u8, length: usize) {
        self.frames.push((tag, length));
    }

    /// Close every frame that has run down to zero. When the outermost
    /// frame closes the message must be in a terminal state.
    pub(crate) fn pop_frames(&mut self) -> ProtocolResult<()> {
        while let Some(&(tag, 0)) = self.frames.last() {
            log::trace!("{}: frame 0x{:02X} closed at offset {}", G::NAME, tag, self.offset);
            self.frames.pop();
        }
        if self.frames.is_empty() {
            if self.end_allowed {
                self.complete = true;
            } else {
                return Err(ProtocolError::PrematureEnd {
                    offset: self.offset,
                });
            }
        }
        Ok(())
    }

    /// Formatted `grammar::state` string for error reports.
    pub(crate) fn state_name(&self) -> String {
        format!("{}::{:?}", G::NAME, self.state)
    }
}

impl<G: Grammar> Default for DecodeSession<G> {
    fn default() -> Self {
        Self::new()
    }
}
