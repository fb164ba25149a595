//! HTTP utility module
//!
//! Response builders and urlencoded helpers shared by the handlers.

pub mod query;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_text_response,
};
