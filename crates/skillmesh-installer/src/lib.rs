//! Dependency resolution and artifact materialization for skill installs
//!
//! The flow: parse a `name[@version]` target spec, resolve it and its
//! transitive dependencies against the registry into an arena graph, flatten
//! to a dependency-before-dependent plan, fetch each pending bundle from
//! content-addressed storage, verify and place it in the install target, and
//! finally pin the whole graph in a schema-validated lockfile.

pub mod bundle;
pub mod error;
pub mod installer;
pub mod lockfile;
pub mod plan;
pub mod resolver;
pub mod spec;
pub mod storage;
pub mod target;
pub mod tree;

pub use bundle::{BundleManifest, Bundler, TarGzBundler};
pub use error::{InstallError, Result};
pub use installer::{InstallOptions, InstallReport, Installer};
pub use lockfile::{Lockfile, LockfileEntry, LOCKFILE_NAME, LOCKFILE_VERSION};
pub use plan::install_order;
pub use resolver::{DependencyNode, ResolvedGraph, Resolver};
pub use spec::TargetSpec;
pub use storage::{HttpStorageGateway, MemoryStorageGateway, StorageGateway};
pub use target::{InstallTarget, InstalledManifest, MANIFEST_NAME};
pub use tree::render_tree;
