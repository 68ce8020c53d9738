pub mod filters;
pub mod synonyms;
pub mod understanding;
pub mod vocabulary;

pub use understanding::QueryUnderstanding;
pub use vocabulary::{Lexicon, Vocabulary};
