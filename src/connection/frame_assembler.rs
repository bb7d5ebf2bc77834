//! Splits the serial byte stream into 8-byte occupancy frames.
//!
//! Boundaries are purely positional: there is no sync marker, so a lost or
//! extra byte shifts every later frame.

use log::trace;

use crate::board::physical_position::FRAME_LEN;

#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` and returns every frame completed by it, oldest first.
    pub fn push(&mut self, data: &[u8]) -> Vec<[u8; FRAME_LEN]> {
        trace!("received {} bytes: {data:02X?}", data.len());
        self.pending.extend_from_slice(data);

        let complete = self.pending.len() / FRAME_LEN;
        let mut frames = Vec::with_capacity(complete);
        for chunk in self.pending.chunks_exact(FRAME_LEN) {
            let mut frame = [0u8; FRAME_LEN];
            frame.copy_from_slice(chunk);
            frames.push(frame);
        }
        self.pending.drain(..complete * FRAME_LEN);
        frames
    }

    /// Bytes waiting for the rest of their frame.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::FrameAssembler;

    #[test]
    fn frames_span_reads() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.push(&[0xC3; 5]).is_empty());
        assert_eq!(assembler.pending_len(), 5);

        let frames = assembler.push(&[0xC3, 0xC3, 0xC3, 1, 2]);
        assert_eq!(frames, vec![[0xC3; 8]]);
        assert_eq!(assembler.pending_len(), 2);
    }

    #[test]
    fn one_read_can_complete_several_frames() {
        let mut assembler = FrameAssembler::new();
        let mut data = vec![0u8; 8];
        data.extend([0xFF; 8]);
        data.push(7);

        let frames = assembler.push(&data);
        assert_eq!(frames, vec![[0u8; 8], [0xFF; 8]]);
        assert_eq!(assembler.pending_len(), 1);

        assembler.clear();
        assert_eq!(assembler.pending_len(), 0);
    }
}
