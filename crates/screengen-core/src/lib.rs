pub mod collision;
pub mod config;
pub mod doctor;
pub mod memory_tree;
pub mod names;
pub mod project;
pub mod resolver;
pub mod template;
pub mod time;
pub mod transaction;
pub mod tree;
