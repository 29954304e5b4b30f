pub mod loaders;
pub mod orchestrator;
pub mod origin;
pub mod poll;
pub mod registry;
pub mod shell;
