pub mod interaction_state;
pub mod timeline_state;
pub mod ui_state;

pub use interaction_state::InteractionState;
pub use timeline_state::TimelineState;
pub use ui_state::UiState;
