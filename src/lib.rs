pub mod config;
pub mod logger;
pub mod post;
pub mod post_store;
pub mod server;
mod post_render;
mod preview;
mod query_string;
mod test_data;
mod text_utils;
mod view;
