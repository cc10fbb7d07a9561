pub mod clean;
pub mod doctor;
pub mod scan;
pub mod targets;
