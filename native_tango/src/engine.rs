//! Client-side table engine. Each submodule owns one step of the
//! snapshot -> eligibility -> action cycle.

pub mod action;
pub mod clock;
pub mod dispatcher;
pub mod eligibility;
pub mod phase_table;
pub mod reducer;
pub mod resolution;
pub mod state;

pub use action::{parse_amount, parse_slot, Action, CardSlot};
pub use clock::{ClockReconciler, ClockState};
pub use dispatcher::{ActionDispatcher, ActionSink, DecisionKind, InFlight};
pub use eligibility::{compute_eligibility, EligibleActions};
pub use phase_table::{ControlRule, PhaseEffects, PhaseEntry};
pub use reducer::{apply_snapshot, reduce};
pub use resolution::format_hand_result;
pub use state::{ClientState, GameSnapshot, HandKey, LocalIdentity, TableSeat};
