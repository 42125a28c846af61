pub mod track;

pub use track::{TagScore, Track};
