pub mod path;
pub mod validate;

pub use path::ApiPath;
pub use validate::{FieldErrors, Validate, ValidatedJson};
