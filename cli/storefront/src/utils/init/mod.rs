mod client;
mod logger;

pub use client::*;
pub use logger::*;
