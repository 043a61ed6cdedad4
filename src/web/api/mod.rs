pub mod contacts;
pub mod error;
pub mod feed;
pub mod settings;
