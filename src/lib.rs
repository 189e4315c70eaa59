pub mod catalog_fetch;
pub mod config;
pub mod convert;
pub mod demo_feed;
pub mod http_cache;
pub mod http_client;
pub mod layout;
pub mod pagination;
pub mod provider;
pub mod render;
pub mod render_cache;
pub mod scroll;
pub mod search;
pub mod similar;
pub mod state;
pub mod stats;
