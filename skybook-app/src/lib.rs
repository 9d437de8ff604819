pub mod render;
pub mod routes;
pub mod state;
pub mod views;

pub use routes::{Navigation, Outcome, Route};
pub use state::AppState;
