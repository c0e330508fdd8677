// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod clock;
pub mod config;
pub mod expiry;
pub mod logging;
pub mod pass;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod zone;

pub use app::{App, Layer};
pub use pass::{PassCatalog, PassType};
pub use session::Session;
