//! Secret storage
//!
//! The only secret this repository handles is the model-provider API key,
//! supplied via the process environment. It is read on demand, never logged,
//! and never written to disk.

mod env;
mod memory;
mod traits;

pub use env::EnvSecretStore;
pub use memory::MemorySecretStore;
pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
