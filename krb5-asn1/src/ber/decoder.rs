//! The incremental TLV byte engine
//!
//! Header octets are consumed one at a time so the engine can suspend
//! mid-tag or mid-length without any lookahead requirement. Value octets are
//! consumed in bulk: when a complete value is present in the current chunk it
//! is handed to the action as a borrowed slice, otherwise the missing bytes
//! accumulate in the session's reassembly buffer until the value closes.

use std::mem;

use krb5_core::{ProtocolError, ProtocolResult};

use super::container::DecodeSession;
use super::grammar::{Flow, Grammar, Transition};
use super::tlv::{Tag, TlvEvent};

/// Most continuation octets accepted in a long-form tag number.
const MAX_TAG_OCTETS: usize = 4;

/// Where the engine is inside the current TLV.
pub(crate) enum Phase<S, M> {
    /// Expecting the first identifier octet.
    Tag,
    /// Inside a long-form tag number.
    TagExt {
        start: usize,
        first: u8,
        number: u32,
        count: usize,
    },
    /// Expecting the first length octet.
    LenFirst { start: usize, tag: Tag },
    /// Inside a long-form length.
    LenExt {
        start: usize,
        tag: Tag,
        remaining: usize,
        acc: usize,
    },
    /// Collecting the value of a `Capture` transition.
    Value {
        start: usize,
        header_size: usize,
        tag: Tag,
        length: usize,
        transition: Transition<S, M>,
    },
}

/// Outcome of one [`DecodeSession::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep {
    /// The chunk was consumed and the message is still open.
    MoreInput,
    /// The message closed after `consumed` bytes of the chunk; any
    /// remaining bytes were not examined.
    Complete { consumed: usize },
}

impl<G: Grammar> DecodeSession<G> {
    /// Feed the next chunk of input.
    ///
    /// The chunk boundary is arbitrary: a header or value may straddle any
    /// number of chunks. Errors are definitive; a session that has returned
    /// an error must be discarded.
    pub fn feed(&mut self, chunk: &[u8]) -> ProtocolResult<DecodeStep> {
        let mut pos = 0;
        while pos < chunk.len() {
            if self.complete {
                return Ok(DecodeStep::Complete { consumed: pos });
            }
            match mem::replace(&mut self.phase, Phase::Tag) {
                Phase::Tag => {
                    let byte = chunk[pos];
                    let start = self.offset;
                    pos += 1;
                    self.offset += 1;
                    if byte & 0x1F == 0x1F {
                        self.phase = Phase::TagExt {
                            start,
                            first: byte,
                            number: 0,
                            count: 0,
                        };
                    } else {
                        self.phase = Phase::LenFirst {
                            start,
                            tag: Tag::short(byte),
                        };
                    }
                }
                Phase::TagExt {
                    start,
                    first,
                    number,
                    count,
                } => {
                    let byte = chunk[pos];
                    pos += 1;
                    self.offset += 1;
                    if count >= MAX_TAG_OCTETS {
                        return Err(ProtocolError::InvalidFieldEncoding {
                            offset: start,
                            reason: "tag number exceeds 28 bits".to_string(),
                        });
                    }
                    let number = (number << 7) | u32::from(byte & 0x7F);
                    if byte & 0x80 == 0 {
                        self.phase = Phase::LenFirst {
                            start,
                            tag: Tag::long(first, number),
                        };
                    } else {
                        self.phase = Phase::TagExt {
                            start,
                            first,
                            number,
                            count: count + 1,
                        };
                    }
                }
                Phase::LenFirst { start, tag } => {
                    let byte = chunk[pos];
                    let at = self.offset;
                    pos += 1;
                    self.offset += 1;
                    if byte < 0x80 {
                        self.header_complete(start, tag, usize::from(byte))?;
                    } else if byte == 0x80 {
                        // Indefinite form.
                        return Err(ProtocolError::UnsupportedLength {
                            offset: at,
                            form: byte,
                        });
                    } else {
                        let remaining = usize::from(byte & 0x7F);
                        if remaining > mem::size_of::<usize>() {
                            return Err(ProtocolError::UnsupportedLength {
                                offset: at,
                                form: byte,
                            });
                        }
                        self.phase = Phase::LenExt {
                            start,
                            tag,
                            remaining,
                            acc: 0,
                        };
                    }
                }
                Phase::LenExt {
                    start,
                    tag,
                    remaining,
                    acc,
                } => {
                    let byte = chunk[pos];
                    pos += 1;
                    self.offset += 1;
                    let acc = (acc << 8) | usize::from(byte);
                    if remaining == 1 {
                        self.header_complete(start, tag, acc)?;
                    } else {
                        self.phase = Phase::LenExt {
                            start,
                            tag,
                            remaining: remaining - 1,
                            acc,
                        };
                    }
                }
                Phase::Value {
                    start,
                    header_size,
                    tag,
                    length,
                    transition,
                } => {
                    let available = chunk.len() - pos;
                    let needed = length - self.buffer.len();
                    if available < needed {
                        self.buffer.extend_from_slice(&chunk[pos..]);
                        self.offset += available;
                        pos = chunk.len();
                        self.phase = Phase::Value {
                            start,
                            header_size,
                            tag,
                            length,
                            transition,
                        };
                    } else if self.buffer.is_empty() {
                        // Whole value in this chunk: hand it over without
                        // copying.
                        let value = &chunk[pos..pos + needed];
                        pos += needed;
                        self.offset += needed;
                        self.complete_tlv(start, header_size, tag, length, &transition, value)?;
                    } else {
                        self.buffer.extend_from_slice(&chunk[pos..pos + needed]);
                        pos += needed;
                        self.offset += needed;
                        let value = mem::take(&mut self.buffer);
                        self.complete_tlv(start, header_size, tag, length, &transition, &value)?;
                    }
                }
            }
        }

        if self.complete {
            Ok(DecodeStep::Complete {
                consumed: chunk.len(),
            })
        } else {
            Ok(DecodeStep::MoreInput)
        }
    }

    /// Declare the end of input and extract the message.
    pub fn finish(self) -> ProtocolResult<G::Message> {
        if self.complete {
            return Ok(self.message);
        }
        match self.phase {
            Phase::Tag => Err(ProtocolError::PrematureEnd {
                offset: self.offset,
            }),
            Phase::TagExt { .. } | Phase::LenFirst { .. } | Phase::LenExt { .. } => {
                Err(ProtocolError::TruncatedHeader {
                    offset: self.offset,
                })
            }
            Phase::Value { length, .. } => Err(ProtocolError::TruncatedValue {
                offset: self.offset,
                missing: length - self.buffer.len(),
            }),
        }
    }

    /// Both header parts are in: dispatch through the grammar.
    ///
    /// The grammar lookup runs before any length accounting so that a tag
    /// the grammar rejects reports `UnexpectedTag` even when its length
    /// would not fit either.
    fn header_complete(&mut self, start: usize, tag: Tag, length: usize) -> ProtocolResult<()> {
        let first = tag.first_octet();
        let transition =
            G::transition(self.state, first).ok_or_else(|| ProtocolError::UnexpectedTag {
                offset: start,
                tag: first,
                state: self.state_name(),
            })?;

        let header_size = self.offset - start;
        self.consume(header_size, start, first)?;
        if let Some(&(_, remaining)) = self.frames.last() {
            if length > remaining {
                return Err(ProtocolError::LengthMismatch {
                    offset: start,
                    tag: first,
                });
            }
        }

        match transition.flow {
            Flow::Descend => {
                let event = TlvEvent {
                    tag,
                    length,
                    header_size,
                    start,
                    value: &[],
                };
                self.apply(&transition, &event)?;
                self.push_frame(first, length);
                self.pop_frames()
            }
            Flow::Capture => {
                if length == 0 {
                    self.complete_tlv(start, header_size, tag, length, &transition, &[])
                } else {
                    self.phase = Phase::Value {
                        start,
                        header_size,
                        tag,
                        length,
                        transition,
                    };
                    Ok(())
                }
            }
        }
    }

    /// A captured value is complete: account for it, run the action, close
    /// any frames it exhausted.
    fn complete_tlv(
        &mut self,
        start: usize,
        header_size: usize,
        tag: Tag,
        length: usize,
        transition: &Transition<G::State, G::Message>,
        value: &[u8],
    ) -> ProtocolResult<()> {
        self.consume(length, start, tag.first_octet())?;
        let event = TlvEvent {
            tag,
            length,
            header_size,
            start,
            value,
        };
        self.apply(transition, &event)?;
        self.pop_frames()
    }
}

/// Decode a complete message held in a single buffer.
///
/// Trailing bytes after the message closes are an error.
pub fn decode<G: Grammar>(bytes: &[u8]) -> ProtocolResult<G::Message> {
    let mut session = DecodeSession::<G>::new();
    if let DecodeStep::Complete { consumed } = session.feed(bytes)? {
        if consumed < bytes.len() {
            return Err(ProtocolError::UnexpectedTag {
                offset: consumed,
                tag: bytes[consumed],
                state: format!("{}::<complete>", G::NAME),
            });
        }
    }
    session.finish()
}
