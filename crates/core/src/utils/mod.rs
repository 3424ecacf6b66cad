//! Small helpers shared by the sync services

pub mod text;
