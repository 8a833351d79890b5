mod settings;

pub use settings::{AiSettings, EditorSettings, EXAMPLE_CONFIG};
