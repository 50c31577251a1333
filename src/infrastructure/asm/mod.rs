pub mod client;

pub use client::AsmHttpClient;
