//! Grid path search with robot footprint inflation.

mod bfs;

pub use bfs::find_path;
