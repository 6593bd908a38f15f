//! Recovery of structured content from generative backend responses
//!
//! The backend is contracted to return a JSON object with `content`,
//! `metaSeoTitle` and `metaDescription` fields, but in practice returns:
//! - clean JSON,
//! - JSON wrapped in markdown code fences,
//! - JSON embedded in surrounding prose,
//! - truncated or otherwise malformed JSON,
//! - plain markdown with no JSON structure at all.
//!
//! [`recover`] accepts any of these and always produces a well-formed
//! [`GenerationResponse`] with non-empty HTML content. It never fails and
//! never panics; each recovery tier degrades into the next.
//!
//! [`normalize`] is the markdown-to-HTML cleanup pipeline applied to
//! recovered content. It is idempotent: normalizing already-normalized
//! HTML leaves it unchanged.

pub mod normalize;
mod response;
mod tiers;

pub use normalize::normalize;
pub use response::{fallback_description, fallback_title, GenerationResponse};
pub use tiers::recover;
