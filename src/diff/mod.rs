//! Classification of two tree snapshots into add/remove/modify sets.

mod change_set;
mod engine;

pub use change_set::{ChangeSet, Modification};
pub use engine::DiffEngine;
