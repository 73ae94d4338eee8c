pub mod graph;
pub mod history;
pub mod layout_file;
pub mod script;
pub mod workspace;
