//! Building blocks shared by every HTTP module

mod response;
mod validated_json;

pub use response::{ApiError, MessageResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
