// events.rs - Change notifications consumed once per frame
use std::collections::VecDeque;

/// Something changed that the next frame must react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    CameraChanged,
    TransferFunctionChanged,
    IsoValueChanged(f32),
    RenderModeChanged,
    ViewportResized { width: u32, height: u32 },
}

impl ViewerEvent {
    /// Events of the same kind replace each other while pending
    fn same_kind(&self, other: &ViewerEvent) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// FIFO of pending [`ViewerEvent`]s owned by the application loop.
///
/// At most one event of each kind is pending; a newer one overwrites the
/// payload of the older one in place.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<ViewerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ViewerEvent) {
        match self.pending.iter_mut().find(|e| e.same_kind(&event)) {
            Some(existing) => *existing = event,
            None => self.pending.push_back(event),
        }
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Extend<ViewerEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = ViewerEvent>>(&mut self, iter: T) {
        for event in iter {
            self.push(event);
        }
    }
}
