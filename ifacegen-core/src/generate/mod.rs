//! Serialization of the API model into declaration text.

pub mod literal;
pub mod prior;
pub mod serializer;
pub mod writer;

pub use literal::format_literal;
pub use prior::{compare_prior, fingerprint, PriorState};
pub use serializer::{GeneratedUnit, Generator};
pub use writer::CodeWriter;
