mod restricted_dijkstra;
mod state;

pub(crate) use restricted_dijkstra::{SearchMask, shortest_path};
