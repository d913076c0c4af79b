pub mod data_manager;
pub mod data_provider;
pub mod html_data;
mod web_custom_data;
