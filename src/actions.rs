use bitflags::*;

// One host action per pipeline per tick:
//
// MOVE:      turn, move forward, move backward
// BROADCAST: one message per tick
// TRANSFER:  energy transfer
// ATTACK:    ground or air attack
// SPAWN:     spawn or evolve
//
// Pipelines are independent, so an agent may move, broadcast and transfer in the same tick.

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ActionFlags: u8 {
        const UNSET = 0;

        const MOVE = 1;
        const BROADCAST = 1 << 1;
        const TRANSFER = 1 << 2;
        const ATTACK = 1 << 3;
        const SPAWN = 1 << 4;
    }
}

impl ActionFlags {
    /// Claim the pipelines in `flags` for this tick. False if any was already used.
    pub fn consume(&mut self, flags: ActionFlags) -> bool {
        if !self.intersects(flags) {
            self.insert(flags);

            true
        } else {
            false
        }
    }

    pub fn available(&self, flags: ActionFlags) -> bool {
        !self.intersects(flags)
    }
}
