//! Confirmation subdomain: yes/no decisions requested by the backend.
//!
//! - [`request::ConfirmationRequest`]: what the backend asks
//! - [`request::ConfirmationResponse`]: what the UI answers
//! - [`content_type::ContentType`]: how an attached preview should be shown

pub mod content_type;
pub mod request;
