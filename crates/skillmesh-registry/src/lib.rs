//! The skillmesh registry: an authoritative skill index run as a
//! single-writer process
//!
//! State lives in [`RegistryStore`] and is owned by exactly one task,
//! [`RegistryProcess`]; everything else talks to it through a cloneable
//! [`RegistryHandle`]. Handlers cover search, listing, lookups, download
//! statistics, capability introspection, and the two write paths
//! (`Register-Skill`, `Record-Download`). State only grows: there is no
//! mutation or deletion handler.

pub mod error;
pub mod info;
pub mod process;
pub mod query;
pub mod stats;
pub mod store;

pub use error::{HandlerError, ProcessError};
pub use info::{info_reply, PROTOCOL_VERSION};
pub use process::{RegistryHandle, RegistryProcess};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use store::{RegistryStore, SkillRecord};
