pub mod busy;
pub mod codex;
pub mod constants;
pub mod dictionary;
pub mod grid;
mod lenient;
pub mod macros;
pub mod pictograph;
pub mod placement;
pub mod render;
pub mod sequence;
pub mod signals;
pub mod thumbnail;

#[cfg(test)]
mod test_log;

pub use pictograph::{Pictograph, PictographData, PictographEnv};
pub use sequence::{Sequence, SequenceHeader, SequenceModel};
