//! Pure helpers shared by services and handlers

pub mod attendance;
pub mod search;
