pub mod escape;
pub mod insert;
pub mod schema;

pub use escape::{escape_literal, quote_ident};
pub use insert::render_insert;
pub use schema::{FacilitySchema, DIRECTORY_TYPE_COLUMN, IDENTITY_COLUMN};
