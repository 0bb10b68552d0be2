//! Frame encoding and decoding for the node link.
//!
//! Frame format:
//! - FLAG (1 byte): 0x7E delimiter
//! - HARDWARE, EVENT, DATA (3 bytes, each possibly stuffed)
//! - FLAG (1 byte): 0x7E delimiter
//!
//! Any payload byte equal to FLAG or ESCAPE is sent as ESCAPE followed by the
//! byte XOR 0x20, so a FLAG on the wire is always a frame boundary.

use heapless::Vec;

use crate::events::Event;

/// Frame delimiter
pub const FLAG: u8 = 0x7E;

/// Introduces a stuffed byte
pub const ESCAPE: u8 = 0x7D;

/// Applied to a stuffed byte on both sides
pub const ESCAPE_XOR: u8 = 0x20;

/// Payload size of a valid frame
pub const PAYLOAD_LEN: usize = 3;

/// Bytes the decoder collects between flags before giving up on a frame
pub const DECODE_BUFFER_SIZE: usize = 32;

/// Largest encoded frame (two flags, every payload byte stuffed)
pub const MAX_FRAME_SIZE: usize = 2 + 2 * PAYLOAD_LEN;

/// Raw frame payload in wire order
pub type Payload = [u8; PAYLOAD_LEN];

/// Returns true if `byte` must be stuffed
pub const fn needs_escape(byte: u8) -> bool {
    byte == FLAG || byte == ESCAPE
}

/// Encode a raw payload, handing every wire byte to `put`
pub fn encode_payload(payload: &Payload, mut put: impl FnMut(u8)) {
    put(FLAG);
    for &byte in payload {
        if needs_escape(byte) {
            put(ESCAPE);
            put(byte ^ ESCAPE_XOR);
        } else {
            put(byte);
        }
    }
    put(FLAG);
}

/// Encode an event, handing every wire byte to `put`
pub fn encode(event: &Event, put: impl FnMut(u8)) {
    encode_payload(&event.to_payload(), put);
}

/// Encode an event into a heapless Vec
pub fn encode_to_vec(event: &Event) -> Vec<u8, MAX_FRAME_SIZE> {
    let mut frame = Vec::new();
    encode(event, |byte| {
        // Capacity covers the worst case
        let _ = frame.push(byte);
    });
    frame
}

/// Decoder position within the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeState {
    /// Discarding bytes until a FLAG
    SearchForFlag,
    /// Got FLAG, nothing collected yet
    FlagFound,
    /// Collecting payload bytes
    CollectMsg,
    /// Got ESCAPE, next byte is stuffed
    ByteThin,
}

/// Decoder counters, wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames with a valid length
    pub frames: u16,
    /// Frames dropped for length or overflow
    pub discarded: u16,
    /// Valid-length frames whose identifiers are unknown
    pub rejected: u16,
}

/// Byte-at-a-time frame decoder
///
/// Holds at most one decoded payload. A frame completing before the previous
/// one was taken replaces it.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buffer: [u8; DECODE_BUFFER_SIZE],
    pos: usize,
    pending: Option<Payload>,
    stats: DecoderStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new decoder searching for a flag
    pub const fn new() -> Self {
        Self {
            state: DecodeState::SearchForFlag,
            buffer: [0; DECODE_BUFFER_SIZE],
            pos: 0,
            pending: None,
            stats: DecoderStats {
                frames: 0,
                discarded: 0,
                rejected: 0,
            },
        }
    }

    /// Drop any partial frame and search for the next flag
    ///
    /// A pending decoded frame is kept.
    pub fn reset(&mut self) {
        self.state = DecodeState::SearchForFlag;
        self.pos = 0;
    }

    /// Current decoder state
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Counters since construction
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// True if a decoded frame is waiting
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns true when this byte completed a frame of valid length.
    pub fn feed(&mut self, byte: u8) -> bool {
        match self.state {
            DecodeState::SearchForFlag => {
                if byte == FLAG {
                    self.open();
                }
                false
            }
            DecodeState::FlagFound => {
                match byte {
                    // Idle flags between frames
                    FLAG => {}
                    ESCAPE => self.state = DecodeState::ByteThin,
                    _ => self.store(byte),
                }
                false
            }
            DecodeState::CollectMsg => match byte {
                FLAG => self.close(),
                ESCAPE => {
                    self.state = DecodeState::ByteThin;
                    false
                }
                _ => {
                    self.store(byte);
                    false
                }
            },
            DecodeState::ByteThin => {
                self.store(byte ^ ESCAPE_XOR);
                false
            }
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the number of frames of valid length completed. Only the last
    /// one is kept.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&byte| self.feed(byte)).count()
    }

    /// Take the pending payload as raw bytes
    pub fn take_payload(&mut self) -> Option<Payload> {
        self.pending.take()
    }

    /// Take the pending frame as an event
    ///
    /// A payload with an unknown hardware or event id is consumed and counted
    /// as rejected.
    pub fn take(&mut self) -> Option<Event> {
        let payload = self.pending.take()?;
        let event = Event::from_payload(&payload);
        if event.is_none() {
            self.stats.rejected = self.stats.rejected.wrapping_add(1);
        }
        event
    }

    fn open(&mut self) {
        self.state = DecodeState::FlagFound;
        self.pos = 0;
    }

    fn store(&mut self, byte: u8) {
        if self.pos >= DECODE_BUFFER_SIZE {
            self.stats.discarded = self.stats.discarded.wrapping_add(1);
            self.reset();
            return;
        }
        self.buffer[self.pos] = byte;
        self.pos += 1;
        self.state = DecodeState::CollectMsg;
    }

    fn close(&mut self) -> bool {
        let complete = self.pos == PAYLOAD_LEN;
        if complete {
            let mut payload = [0u8; PAYLOAD_LEN];
            payload.copy_from_slice(&self.buffer[..PAYLOAD_LEN]);
            self.pending = Some(payload);
            self.stats.frames = self.stats.frames.wrapping_add(1);
        } else {
            self.stats.discarded = self.stats.discarded.wrapping_add(1);
        }
        // The closing flag also opens the next frame
        self.open();
        complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, HardwareId};
    use proptest::prelude::*;

    fn decode_all(bytes: &[u8]) -> heapless::Vec<Event, 8> {
        let mut decoder = FrameDecoder::new();
        let mut events = heapless::Vec::new();
        for &byte in bytes {
            if decoder.feed(byte) {
                if let Some(event) = decoder.take() {
                    events.push(event).unwrap();
                }
            }
        }
        events
    }

    #[test]
    fn test_encode_plain() {
        let event = Event::new(HardwareId::RgbController, EventKind::OnlyRed, 0x05);
        assert_eq!(&encode_to_vec(&event)[..], &[0x7E, 0x08, 0xAA, 0x05, 0x7E]);
    }

    #[test]
    fn test_encode_stuffs_flag() {
        let event = Event::new(HardwareId::RgbController, EventKind::OnlyRed, 0x7E);
        assert_eq!(
            &encode_to_vec(&event)[..],
            &[0x7E, 0x08, 0xAA, 0x7D, 0x5E, 0x7E]
        );
    }

    #[test]
    fn test_encode_stuffs_escape() {
        let event = Event::new(HardwareId::RgbController, EventKind::OnlyRed, 0x7D);
        assert_eq!(
            &encode_to_vec(&event)[..],
            &[0x7E, 0x08, 0xAA, 0x7D, 0x5D, 0x7E]
        );
    }

    #[test]
    fn test_roundtrip_every_event() {
        for &hardware in HardwareId::ALL {
            for &kind in EventKind::ALL {
                for data in [0x00, 0x20, 0x5D, 0x5E, 0x7D, 0x7E, 0xFF] {
                    let event = Event::new(hardware, kind, data);
                    let mut decoder = FrameDecoder::new();
                    assert_eq!(decoder.feed_bytes(&encode_to_vec(&event)), 1);
                    assert_eq!(decoder.take(), Some(event));
                }
            }
        }
    }

    #[test]
    fn test_truncated_frame_then_valid() {
        let bytes = [0x7E, 0x01, 0x02, 0x7E, 0x08, 0xAA, 0x05, 0x7E];
        let events = decode_all(&bytes);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            Event::new(HardwareId::RgbController, EventKind::OnlyRed, 0x05)
        );
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut data = heapless::Vec::<u8, 16>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12, 0x34]).unwrap();
        data.extend_from_slice(&[0x7E, 0x09, 0xC0, 0x80, 0x7E]).unwrap();

        let events = decode_all(&data);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::LedRedPwm);
        assert_eq!(events[0].data, 0x80);
    }

    #[test]
    fn test_back_to_back_frames() {
        let first = Event::new(HardwareId::RgbNode, EventKind::LedHuePwm, 1);
        let second = Event::new(HardwareId::RgbNode, EventKind::LedBluePwm, 2);
        let mut data = heapless::Vec::<u8, 16>::new();
        data.extend_from_slice(&encode_to_vec(&first)).unwrap();
        data.extend_from_slice(&encode_to_vec(&second)).unwrap();

        let events = decode_all(&data);
        assert_eq!(&events[..], &[first, second]);
    }

    #[test]
    fn test_newer_frame_overwrites_pending() {
        let first = Event::new(HardwareId::RgbNode, EventKind::LedHuePwm, 1);
        let second = Event::new(HardwareId::RgbNode, EventKind::LedBluePwm, 2);
        let mut decoder = FrameDecoder::new();
        decoder.feed_bytes(&encode_to_vec(&first));
        decoder.feed_bytes(&encode_to_vec(&second));

        assert_eq!(decoder.take(), Some(second));
        assert_eq!(decoder.take(), None);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn test_wrong_length_discarded() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed_bytes(&[0x7E, 1, 2, 3, 4, 0x7E]), 0);
        assert_eq!(decoder.take(), None);
        assert_eq!(decoder.stats().discarded, 1);
        assert_eq!(decoder.state(), DecodeState::FlagFound);
    }

    #[test]
    fn test_idle_flags_absorbed() {
        let mut decoder = FrameDecoder::new();
        decoder.feed_bytes(&[0x7E, 0x7E, 0x7E]);
        assert_eq!(decoder.state(), DecodeState::FlagFound);
        assert_eq!(decoder.stats().discarded, 0);
        assert_eq!(decoder.feed_bytes(&[0x08, 0xAD, 0x00, 0x7E]), 1);
        assert_eq!(decoder.take().map(|e| e.kind), Some(EventKind::AllOff));
    }

    #[test]
    fn test_escape_first_byte() {
        let mut decoder = FrameDecoder::new();
        decoder.feed_bytes(&[0x7E, 0x7D]);
        assert_eq!(decoder.state(), DecodeState::ByteThin);
        decoder.feed(0x5E);
        assert_eq!(decoder.state(), DecodeState::CollectMsg);
        decoder.feed_bytes(&[0x01, 0x02, 0x7E]);
        assert_eq!(decoder.take_payload(), Some([0x7E, 0x01, 0x02]));
    }

    #[test]
    fn test_overflow_returns_to_search() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(FLAG);
        for byte in 0..DECODE_BUFFER_SIZE as u8 {
            decoder.feed(byte);
        }
        assert_eq!(decoder.state(), DecodeState::CollectMsg);
        decoder.feed(0x55);
        assert_eq!(decoder.state(), DecodeState::SearchForFlag);
        assert_eq!(decoder.stats().discarded, 1);

        // Tail of the oversized frame is ignored until the next flag
        decoder.feed_bytes(&[0x01, 0x02, 0x03]);
        assert!(!decoder.has_pending());
        assert_eq!(decoder.feed_bytes(&[0x7E, 0x00, 0x01, 0x02, 0x7E]), 1);
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed_bytes(&[0x7E, 0x42, 0x01, 0x00, 0x7E]), 1);
        assert_eq!(decoder.take(), None);
        assert_eq!(decoder.stats().rejected, 1);
        assert_eq!(decoder.stats().frames, 1);
    }

    proptest! {
        #[test]
        fn test_payload_roundtrip(hardware in any::<u8>(), kind in any::<u8>(), data in any::<u8>()) {
            let payload = [hardware, kind, data];
            let mut decoder = FrameDecoder::new();
            let mut completed = 0;
            encode_payload(&payload, |byte| {
                if decoder.feed(byte) {
                    completed += 1;
                }
            });
            prop_assert_eq!(completed, 1);
            prop_assert_eq!(decoder.take_payload(), Some(payload));
        }

        #[test]
        fn test_encoded_frame_has_flags_only_at_ends(data in any::<u8>(), kind in 0usize..EventKind::ALL.len()) {
            let event = Event::new(HardwareId::RgbController, EventKind::ALL[kind], data);
            let frame = encode_to_vec(&event);
            prop_assert_eq!(frame[0], FLAG);
            prop_assert_eq!(frame[frame.len() - 1], FLAG);
            prop_assert!(frame[1..frame.len() - 1].iter().all(|&b| b != FLAG));
        }
    }
}
