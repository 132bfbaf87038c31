pub mod lifecycle;
mod state;

pub use state::{StateError, StateStore};
