pub mod eval;
pub mod models;
pub mod video;
