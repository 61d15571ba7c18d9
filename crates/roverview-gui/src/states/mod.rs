mod ui;
mod viewport;

pub use ui::{UIState, ViewPreset};
pub use viewport::TextureState;
