pub mod listener;
pub mod state;

pub use state::{AppState, Timeouts};
