//! Background workers.

pub mod persist_worker;
