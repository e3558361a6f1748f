pub mod config;
pub mod logging;

pub mod batch;
pub mod bookmarks;
pub mod checksum;
pub mod fetch;
pub mod naming;
pub mod retry;
