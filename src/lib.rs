pub mod app;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod config;
pub mod dates;
pub mod db;
pub mod destinations;
pub mod error;
pub mod images;
pub mod plans;
pub mod reviews;
pub mod state;
pub mod weather;

pub use app::build_app;
pub use state::AppState;
