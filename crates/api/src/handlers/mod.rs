pub mod project;
pub mod shot;
pub mod task;
pub mod version;
