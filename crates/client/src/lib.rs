//! Headless client for the camp combat runtime.
//!
//! Loads content and the character store, starts a [`runtime::Runtime`] and
//! lets [`battle::AutoBattle`] fight in the configured zone while the combat
//! log is printed to stdout.
pub mod battle;
pub mod config;
pub mod display;
pub mod logging;
pub mod session;

pub use battle::{AutoBattle, BattleSettings, BattleSummary};
pub use config::ClientConfig;
pub use session::{load_or_create, start_session};
