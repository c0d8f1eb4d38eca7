//! Use-Cases der Application-Layer-Orchestrierung.

pub mod analysis;
pub mod editing;
pub mod history;
pub mod layout;
pub mod notify;
pub mod transfer;
