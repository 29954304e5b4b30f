//! Loader strategies.
//!
//! Both implement [`mfe_shell_sdk::MfeLoader`] independently; the
//! orchestrator never knows which one it is driving.

pub mod federated;
pub mod script_sequence;

pub use federated::FederatedModuleLoader;
pub use script_sequence::{LoaderPhase, ScriptSequenceConfig, ScriptSequenceLoader};
