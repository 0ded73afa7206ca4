//! scripture-text
//!
//! Lexical side of retrieval: the tokenizer and BM25 index built over corpus
//! texts, and the static query expander used for the recall-widening pass.

pub mod bm25;
pub mod expand;

pub use bm25::{tokenize, Bm25Index};
pub use expand::expand;
