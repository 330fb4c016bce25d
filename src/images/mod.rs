pub mod client;
pub mod seed;
pub mod services;
