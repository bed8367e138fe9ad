mod embedding;
mod supercell;

pub use embedding::{Embedding, EmbeddingData};
pub use supercell::{bcc_positions, PositionIndex};
