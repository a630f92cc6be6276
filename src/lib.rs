//! lodedb - streaming backup restore for the lodedb key-value store

pub mod cli;
pub mod observability;
pub mod restore;
pub mod store;
