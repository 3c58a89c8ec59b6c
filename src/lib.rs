pub mod ai;
pub mod api;
pub mod app;
pub mod app_state;
pub mod client;
pub mod context;
pub mod error;
pub mod logging;
pub mod message;
pub mod mock;
pub mod prompt;
pub mod scenario;
pub mod server;
pub mod session;
pub mod settings;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use ai::{ChatRelay, CompletionBackend, OpenAIBackend, RelayOptions};
pub use app::{Action, App};
pub use app_state::Page;
pub use client::{BackendStatus, ProxyClient};
pub use error::{AIError, AppError};
pub use message::Message;
pub use scenario::{Catalog, Scenario};
pub use session::Session;
pub use settings::Settings;
