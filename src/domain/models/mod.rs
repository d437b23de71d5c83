//! 领域实体

pub mod changeset;
pub mod variable;

pub use changeset::Changeset;
pub use variable::{
    AllowList, ExportEntry, ExportListing, LineMarker, MarkedEntry, OutputFormat, VarValue,
    is_valid_name,
};
