mod settings;

pub use settings::{ApiKey, Settings, DEFAULT_API_BASE_URL};
