//! State module for tracking harvest progress
//!
//! A category's state is its persisted record collection plus the set of
//! record ids it contains. It is loaded at the start of the category,
//! appended to as products are extracted and written back after every
//! subcategory, so an interrupted run resumes where the last save left it.

mod category_state;

pub use category_state::CategoryState;
