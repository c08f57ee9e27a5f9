use nalgebra::Vector3;

use crate::sim::{LogEntry, SimulationLog};

/// Roughly how many frames a replay of a full run should produce.
pub const TARGET_FRAMES: usize = 400;

// ---------------------------------------------------------------------------
// Replay frames
// ---------------------------------------------------------------------------

/// One replay frame: the vehicle at log entry `index` plus the path flown so far.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub index: usize,
    pub time: f64,
    pub position: Vector3<f64>,
    pub trail: &'a [LogEntry],
}

/// Lazy, strided walk over a finished log.
///
/// Cloning gives an independent cursor; a fresh `ReplayFrames::new` always
/// starts again at the first entry. The last entry is always emitted.
#[derive(Debug, Clone)]
pub struct ReplayFrames<'a> {
    entries: &'a [LogEntry],
    stride: usize,
    next: usize,
    done: bool,
}

impl<'a> ReplayFrames<'a> {
    pub fn new(log: &'a SimulationLog) -> Self {
        Self::with_stride(log, (log.len() / TARGET_FRAMES).max(1))
    }

    pub fn with_stride(log: &'a SimulationLog, stride: usize) -> Self {
        let entries = log.entries();
        Self {
            entries,
            stride: stride.max(1),
            next: 0,
            done: entries.is_empty(),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn frame(&self, index: usize) -> Frame<'a> {
        let e = &self.entries[index];
        Frame {
            index,
            time: e.time,
            position: e.state.pos,
            trail: &self.entries[..=index],
        }
    }
}

impl<'a> Iterator for ReplayFrames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if self.done {
            return None;
        }
        let last = self.entries.len() - 1;
        let index = self.next.min(last);
        if index == last {
            self.done = true;
        } else {
            self.next += self.stride;
        }
        Some(self.frame(index))
    }
}

// ---------------------------------------------------------------------------
// Plot extents
// ---------------------------------------------------------------------------

/// Axis-aligned extents of a run, padded by a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Bounds {
    /// Extents over every logged position and every waypoint.
    ///
    /// `margin` pads every side except the bottom.
    pub fn from_log(log: &SimulationLog, margin: f64) -> Self {
        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);

        for p in log.positions().chain(log.route().iter().copied()) {
            min = min.inf(&p);
            max = max.sup(&p);
        }

        let pad = Vector3::repeat(margin);
        let ground = min.z.min(0.0);
        let mut min = min - pad;
        let max = max + pad;

        // No margin below: the bottom edge is the ground or the lowest point under it
        min.z = ground;

        Self { min, max }
    }
}
