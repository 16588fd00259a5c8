pub mod clock;
pub mod crypto;
pub mod duration;
pub mod text;
