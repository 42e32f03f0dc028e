pub mod bfs;
pub mod degree;
