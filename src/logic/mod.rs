//! Selection business logic: XP scoring, player selection, registration lifecycle, import.

mod import;
mod registration;
mod selector;
pub(crate) mod xp;

pub use import::{candidates_from_csv, ImportError};
pub use registration::{close_registration, reopen_registration};
pub use selector::{select, select_with_config};
pub use xp::{calculate_xp, XpWeights};
