pub mod display_state;
pub mod fetch_view;

pub use display_state::{DisplayState, FetchPhase};
pub use fetch_view::{FetchView, RepaintHook, SamplesView};
