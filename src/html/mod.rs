//! HTML text pipeline: plain-text extraction, title and link extraction,
//! and the two tokenizers shared with the index and the search front-end.
//!
//! Everything here is a pure function over the raw page body. The crawler
//! and the search server must tokenize identically for indexed terms and
//! query terms to match bit-exactly, so both variants live in this module.

mod clean;
mod links;
mod tokens;

pub use clean::{extract_text, get_title};
pub use links::extract_links;
pub use tokens::{extract_words, parse_query, MAX_TOKEN_LEN, MIN_TOKEN_LEN};
