// Utility modules

pub mod detect;
pub mod encode;
