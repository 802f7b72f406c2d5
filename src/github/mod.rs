mod client;
pub mod link;
pub mod models;

pub use client::{GithubClient, Query, PER_PAGE};
