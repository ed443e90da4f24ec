//! Parsed trace representation

use crate::common::Span;
use smpc::bus::PortInput;
use smpc::types::PhysicalPort;

/// A whole capture: frames in playback order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    pub frames: Vec<FrameSpec>,
}

impl Trace {
    /// Number of polls the trace plays back, repeats included
    pub fn poll_count(&self) -> u64 {
        self.frames.iter().map(|frame| u64::from(frame.repeat)).sum()
    }

    /// Frames with each one repeated as often as it asks
    pub fn polls(&self) -> impl Iterator<Item = &FrameSpec> {
        self.frames
            .iter()
            .flat_map(|frame| std::iter::repeat_n(frame, frame.repeat as usize))
    }
}

/// What both connectors report for one or more consecutive polls
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    /// How many polls this reading lasts (at least 1)
    pub repeat: u32,
    /// Indexed by [`PhysicalPort::index`]
    pub ports: [PortInput; 2],
    pub span: Span,
}

impl FrameSpec {
    pub fn port(&self, port: PhysicalPort) -> &PortInput {
        &self.ports[port.index()]
    }
}
