use log::*;

const MAX_STATE_TRANSITIONS: u32 = 20;

/// Drive a state machine until it settles for this tick. `tick_fn` returns the next
/// state to enter immediately, or `None` once the state has done its work. A failing
/// state keeps its place and the error goes to the caller.
pub fn run_state_machine_result<S, F, E>(state: &mut S, label: &str, mut tick_fn: F) -> Result<(), E>
where
    F: FnMut(&mut S) -> Result<Option<S>, E>,
{
    let mut transitions = 0u32;
    while let Some(new_state) = tick_fn(state)? {
        *state = new_state;
        transitions += 1;
        if transitions >= MAX_STATE_TRANSITIONS {
            error!(
                "State machine '{}' exceeded {} transitions in a single tick, breaking to prevent infinite loop",
                label, MAX_STATE_TRANSITIONS
            );
            break;
        }
    }
    Ok(())
}
