mod client;
mod inference;

pub use client::CerebrasDetector;
