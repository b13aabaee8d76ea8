//! Pipeline stages for contract generation.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ normalize ──▶ context ──▶ render ──▶ convert
//! (JSON)    (rules)      (strings)     (keys)      (template) (PDF, optional)
//! ```
//!
//! 1. [`input`]: load a `ContractInput` from a file or stdin
//! 2. [`validate`]: collect every rule violation; stops the pipeline before
//!    any file I/O
//! 3. [`normalize`]: trim, format money and dates, build the signing line
//! 4. [`context`]: map onto the fixed placeholder vocabulary
//! 5. [`render`]: substitute into the text/DOCX template via [`template`]
//! 6. [`convert`]: run the external converter under a timeout; failure is
//!    non-fatal

pub mod context;
pub mod convert;
pub mod input;
pub mod normalize;
pub mod render;
pub mod template;
pub mod validate;
