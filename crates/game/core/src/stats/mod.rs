//! Stat model shared by the player and mobs.
//!
//! Only base values are stored. Maxima, effective attributes and resists are
//! derived on demand from base values plus the summed [`StatMods`] of active
//! effects.
pub mod core;
pub mod modifiers;
pub mod resists;
pub mod resources;

pub use self::core::{Attribute, Attributes};
pub use modifiers::{StatKey, StatMods, apply_signed};
pub use resists::{DamageSchool, ResistValues};
pub use resources::{Resource, ResourcePool, VitalMaxima, VitalSnapshot, Vitals};
