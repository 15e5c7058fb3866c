pub mod client;

pub use client::{ChannelTimings, ClientConfig};
