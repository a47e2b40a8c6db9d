pub mod app_name;
pub mod config;
pub mod generation;
pub mod icon_service;
pub mod icon_set;
pub mod icon_store;
pub mod openai_service;
pub mod remote_error;
pub mod request_clock;
pub mod screenshot;
pub mod theme;
#[cfg(test)]
pub mod tests;
