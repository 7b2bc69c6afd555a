//! Custom audiences
//!
//! Form rules, ID allocation, submission to the upsert procedure and the
//! read-back of persisted audiences.

mod form;
mod id;
mod listing;
mod submit;

pub use form::FormRenderer;
pub use listing::AudienceListing;
pub use submit::AudienceSubmitter;
