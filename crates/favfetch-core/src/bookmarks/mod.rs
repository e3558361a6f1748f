//! Bookmark collection: categories of items, each item with an optional icon reference.
//!
//! The document is kept as close to the input as possible. Fields this tool
//! does not understand are carried through unchanged and in their original
//! order, so a load/save cycle only touches the icon references it patched.

mod model;
mod store;

pub use model::{BookmarkCollection, Category, IconRef, Item, FAVICON_FIELD};
pub use store::{load, save};
