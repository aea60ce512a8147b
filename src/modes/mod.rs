//! Mode declarations and determinations.

mod collection;
mod mode;

pub use collection::ModeCollection;
pub use mode::{Determination, Mode, ModeKind, Recall, Template};
