pub mod news;
pub mod options;
pub mod rating;
pub mod snapshot;
