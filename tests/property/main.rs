// tests/property/main.rs
mod chunks;
mod policy;
