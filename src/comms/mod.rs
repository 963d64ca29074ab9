pub mod channel;
pub mod inbox;
pub mod message;

pub use channel::BroadcastChannel;
pub use inbox::Inbox;
pub use message::*;
