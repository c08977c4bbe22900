pub mod common;
pub mod fixture;
pub mod report;
pub mod team;
