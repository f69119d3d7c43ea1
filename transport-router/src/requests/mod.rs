//! JSON request documents and responses.

mod documents;
mod stat;

pub use documents::{MakeBaseRequest, ProcessRequestsRequest};
pub use stat::{StatRequest, process_all, process_request};
