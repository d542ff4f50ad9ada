mod controller;
mod guard;
mod state;

pub use controller::SessionController;
pub use state::SessionState;
