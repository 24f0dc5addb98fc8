pub mod ask;
pub mod doctor;
pub mod onboard;
pub mod serve;
pub mod tool;
