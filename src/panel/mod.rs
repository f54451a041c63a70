//! Arm/disarm state machine.
//!
//! ```text
//!            [known tag]
//!   UNARMED ────────────▶ ARMED
//!      ▲                    │
//!      └────[known tag]─────┘   (display cleared on the way down)
//!
//!   no tag / unknown tag: stay
//! ```
//!
//! The machine is a pure function of `(current, tag read)`. The caller
//! owns the state across cycles and performs the display clear when it
//! observes an `Armed → Unarmed` edge.

use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Whether door and motion events are escalated to alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ArmState {
    /// Door/motion events are recorded as non-events.
    #[default]
    Unarmed = 0,
    /// Door/motion events are reported as alarms.
    Armed = 1,
}

impl ArmState {
    pub fn is_armed(self) -> bool {
        self == Self::Armed
    }

    /// The opposite state.
    pub fn toggled(self) -> Self {
        match self {
            Self::Unarmed => Self::Armed,
            Self::Armed => Self::Unarmed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Numeric id reported by the RFID reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl core::fmt::Display for TagId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two pre-provisioned tags allowed to toggle the arm state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownTags([TagId; 2]);

impl KnownTags {
    pub const fn new(first: TagId, second: TagId) -> Self {
        Self([first, second])
    }

    /// Exact-equality membership test against either tag.
    pub fn contains(&self, tag: TagId) -> bool {
        self.0[0] == tag || self.0[1] == tag
    }
}

impl From<&SystemConfig> for KnownTags {
    fn from(config: &SystemConfig) -> Self {
        let [a, b] = config.known_tags;
        Self::new(TagId(a), TagId(b))
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Compute the next arm state from the current one and this cycle's tag read.
///
/// Only a tag matching one of the known tags has any effect, and its
/// effect is always a toggle.
pub fn transition(current: ArmState, tag: Option<TagId>, known: &KnownTags) -> ArmState {
    match tag {
        Some(id) if known.contains(id) => current.toggled(),
        _ => current,
    }
}


#[cfg(all(test, not(target_os = "espidf")))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_state() -> impl Strategy<Value = ArmState> {
        prop_oneof![Just(ArmState::Unarmed), Just(ArmState::Armed)]
    }

    proptest! {
        #[test]
        fn non_member_ids_never_change_state(
            state in arb_state(),
            a in any::<u32>(),
            b in any::<u32>(),
            id in any::<u32>(),
        ) {
            prop_assume!(id != a && id != b);
            let known = KnownTags::new(TagId(a), TagId(b));
            prop_assert_eq!(transition(state, Some(TagId(id)), &known), state);
        }

        #[test]
        fn member_ids_always_toggle(
            state in arb_state(),
            a in any::<u32>(),
            b in any::<u32>(),
            pick_first in any::<bool>(),
        ) {
            let known = KnownTags::new(TagId(a), TagId(b));
            let id = if pick_first { a } else { b };
            prop_assert_eq!(transition(state, Some(TagId(id)), &known), state.toggled());
        }

        #[test]
        fn state_tracks_parity_of_known_reads(reads in proptest::collection::vec(any::<Option<bool>>(), 0..64)) {
            // Some(true) = known tag, Some(false) = stranger, None = no read.
            let known = KnownTags::new(TagId(7), TagId(11));
            let mut state = ArmState::Unarmed;
            let mut toggles = 0usize;
            for read in reads {
                let tag = read.map(|k| if k { TagId(7) } else { TagId(8) });
                if read == Some(true) {
                    toggles += 1;
                }
                state = transition(state, tag, &known);
            }
            prop_assert_eq!(state.is_armed(), toggles % 2 == 1);
        }
    }
}
