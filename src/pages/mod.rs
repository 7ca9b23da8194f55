pub mod dag;
pub mod not_found;
pub mod word_graph;
