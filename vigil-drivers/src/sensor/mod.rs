//! Analog sensor acquisition

pub mod settling;

pub use settling::SettlingSampler;
