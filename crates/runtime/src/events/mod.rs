//! Topic-based event bus for runtime events.
//!
//! The session worker publishes every combat log line and every
//! state-changing outcome; consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatFeed, EffectEndReason, EncounterEvent, ProgressionEvent};
