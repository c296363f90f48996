pub mod classifier;
pub mod coordinator;
pub mod editor;
pub mod matrix;
pub mod store;
pub mod subject_key;
