pub mod catalog;
pub mod config;
pub mod merge;
pub mod output;
pub mod source;
pub mod sql;

pub use catalog::ServiceCatalog;
pub use config::{MentalHealthMode, MergeConfig};
pub use merge::{run, MergeReport};
