pub mod catalog;
pub mod edge;
pub mod graph;
pub mod model;
pub mod node;
pub mod serializer;
pub mod step;
