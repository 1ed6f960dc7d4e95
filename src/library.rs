//! Library layer: directory scanning, tag reading and the track catalog.

mod catalog;
mod model;
mod scan;
mod tags;

pub use catalog::{CatalogError, TrackCatalog};
pub use model::Track;
pub use scan::scan;
pub use tags::{LoftyTagReader, TagError, TagReader, TrackTags};
