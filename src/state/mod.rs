//! State persisted between runs

mod info_flag;
mod names;

pub use info_flag::InfoFlag;
pub use names::RememberedNames;
