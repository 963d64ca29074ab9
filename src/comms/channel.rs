use super::message::WireMessage;
use crate::geometry::Location;

struct Posted {
    origin: Location,
    message: WireMessage,
}

/// In-process broadcast transport with one tick of latency.
///
/// Messages posted during a tick become readable after `end_tick`, by any reader within
/// `radius` of where the sender stood. Reads copy; nothing is consumed.
pub struct BroadcastChannel {
    radius: f64,
    pending: Vec<Posted>,
    visible: Vec<Posted>,
}

impl BroadcastChannel {
    pub fn new(radius: f64) -> BroadcastChannel {
        BroadcastChannel {
            radius,
            pending: Vec::new(),
            visible: Vec::new(),
        }
    }

    pub fn post(&mut self, origin: Location, message: WireMessage) {
        self.pending.push(Posted { origin, message });
    }

    pub fn end_tick(&mut self) {
        self.visible = std::mem::take(&mut self.pending);
    }

    pub fn read(&self, at: Location) -> Vec<WireMessage> {
        self.visible
            .iter()
            .filter(|p| p.origin.distance_to(at) <= self.radius)
            .map(|p| p.message.clone())
            .collect()
    }
}
