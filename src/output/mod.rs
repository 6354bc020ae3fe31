//! Output document generation

pub mod writer;

pub use writer::{PdfDocumentWriter, DEFAULT_RESOLUTION_DPI};
