pub mod callback;
pub mod controller;
pub mod handlers;
pub mod models;
pub mod session;

pub use callback::{handle_callback, CallbackError, Navigation};
pub use controller::AuthController;
pub use models::{Role, TokenPair, User};
pub use session::SessionStore;
