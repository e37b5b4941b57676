//! Amharic text cleaning, normalization and tokenization.
//!
//! The whole chain is exposed through [`preprocess_text`]; the individual
//! steps stay public so callers can run or test any one of them in isolation.

pub mod cleaning;
pub mod ethiopic;
pub mod normalizer;
pub mod pipeline;
pub mod stopwords;
pub mod tokenizer;

pub use pipeline::{
    preprocess_cell, preprocess_text, ProcessedText, Step, StepKind, StepOutput, PIPELINE_STEPS,
};
pub use tokenizer::{sent_tokenize, word_tokenize};
