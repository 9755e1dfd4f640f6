//! Models exchanged with the conferencing component

pub mod bundle;
pub mod settings;
pub mod user_info;
