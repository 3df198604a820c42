pub mod eval;
pub mod video;
