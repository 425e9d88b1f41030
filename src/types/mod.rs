pub mod contact;
pub mod response;

pub use contact::{is_linkedin_profile_url, Citation, ContactQuery, ContactRecord};
pub use response::{ErrorResponse, ExtractionResult};
