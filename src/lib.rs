pub mod aggregate;
pub mod commands;
pub mod interact;
pub mod scanner;
pub mod throttle;
pub mod tree;
pub mod treemap;
pub mod wire;
