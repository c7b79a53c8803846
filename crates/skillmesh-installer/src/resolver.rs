//! Dependency resolution
//!
//! Depth-first walk over the registry's dependency metadata producing a
//! [`ResolvedGraph`]: an arena of nodes with child indices. Each skill name
//! resolves at most once per run (a global memo keyed by name); a name
//! reappearing on its own resolution path is a cycle and aborts the run with
//! the offending path. A memo hit is re-checked against the requesting
//! constraint so two dependents cannot silently disagree about a version.

use std::collections::BTreeMap;

use futures::future::BoxFuture;
use futures::FutureExt;
use semver::{Version, VersionReq};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use skillmesh_client::RegistryClient;
use skillmesh_types::reply::STATUS_ERROR;
use skillmesh_types::SkillVersion;

use crate::error::{InstallError, Result};
use crate::spec::TargetSpec;
use crate::target::InstallTarget;

/// One resolved skill in the graph
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub name: String,
    pub version: String,
    pub content_id: String,
    /// Exact record already materialized in the install target
    pub is_installed: bool,
    /// Arena indices of direct dependencies, in declaration order
    pub children: Vec<usize>,
}

/// Arena-backed dependency graph rooted at the requested skill
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    pub(crate) nodes: Vec<DependencyNode>,
    pub(crate) root: usize,
}

impl ResolvedGraph {
    pub fn root(&self) -> &DependencyNode {
        &self.nodes[self.root]
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &DependencyNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Default)]
struct ResolveCtx {
    nodes: Vec<DependencyNode>,
    memo: BTreeMap<String, usize>,
}

/// Resolves a target spec against the registry
pub struct Resolver<'a> {
    client: &'a RegistryClient,
    target: &'a InstallTarget,
    cancel: CancellationToken,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a RegistryClient, target: &'a InstallTarget) -> Self {
        Self {
            client,
            target,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolve `spec` and everything it transitively depends on
    pub async fn resolve(&self, spec: &TargetSpec) -> Result<ResolvedGraph> {
        let mut ctx = ResolveCtx::default();
        // A bare version in a requirement means caret range; a version
        // named on the target is an exact pin
        let constraint = spec.version.as_ref().map(|v| format!("={v}"));
        let root = self
            .resolve_node(&mut ctx, spec.name.clone(), constraint, Vec::new())
            .await?;
        Ok(ResolvedGraph {
            nodes: ctx.nodes,
            root,
        })
    }

    fn resolve_node<'s: 'f, 'c: 'f, 'f>(
        &'s self,
        ctx: &'c mut ResolveCtx,
        name: String,
        constraint: Option<String>,
        path: Vec<String>,
    ) -> BoxFuture<'f, Result<usize>> {
        async move {
            if self.cancel.is_cancelled() {
                return Err(InstallError::UserCancelled);
            }

            // Cycle check runs before the memo: a back-edge must fail even
            // though its target is already resolved on this very path
            if path.contains(&name) {
                let start = path.iter().position(|n| n == &name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].to_vec();
                cycle.push(name);
                return Err(InstallError::DependencyCycle { path: cycle });
            }

            if let Some(&index) = ctx.memo.get(&name) {
                let resolved = ctx.nodes[index].version.clone();
                let requirement = parse_requirement(&name, constraint.as_deref())?;
                let satisfied = match &requirement {
                    None => true,
                    Some(req) => Version::parse(&resolved)
                        .map(|v| req.matches(&v))
                        .unwrap_or(false),
                };
                if !satisfied {
                    return Err(InstallError::DependencyConflict {
                        name,
                        resolved,
                        constraint: constraint.unwrap_or_default(),
                    });
                }
                return Ok(index);
            }

            let record = self.lookup(&name, constraint.as_deref()).await?;
            debug!(name = %record.name, version = %record.version, "dependency resolved");

            let index = ctx.nodes.len();
            ctx.nodes.push(DependencyNode {
                name: record.name.clone(),
                version: record.version.clone(),
                content_id: record.content_id.clone(),
                is_installed: self.target.is_installed(
                    &record.name,
                    &record.version,
                    &record.content_id,
                ),
                children: Vec::new(),
            });
            ctx.memo.insert(name.clone(), index);

            let mut child_path = path;
            child_path.push(name);

            for dep in &record.dependencies {
                let dep_constraint = match dep.version_constraint.trim() {
                    "" => None,
                    raw => Some(raw.to_string()),
                };
                let child = self
                    .resolve_node(ctx, dep.name.clone(), dep_constraint, child_path.clone())
                    .await?;
                ctx.nodes[index].children.push(child);
            }

            Ok(index)
        }
        .boxed()
    }

    /// Fetch a skill's history and pick the newest version the constraint
    /// accepts
    async fn lookup(&self, name: &str, constraint: Option<&str>) -> Result<SkillVersion> {
        let reply = self.client.get_versions(name).await?;
        if reply.status == STATUS_ERROR || reply.versions.is_empty() {
            return Err(InstallError::DependencyUnresolvable {
                name: name.to_string(),
                reason: reply
                    .error
                    .unwrap_or_else(|| "no published versions".to_string()),
            });
        }

        let requirement = parse_requirement(name, constraint)?;
        let req = match requirement {
            // History arrives newest-first; unconstrained means latest
            None => return Ok(reply.versions[0].clone()),
            Some(req) => req,
        };

        for candidate in &reply.versions {
            if let Ok(version) = Version::parse(&candidate.version) {
                if req.matches(&version) {
                    return Ok(candidate.clone());
                }
            }
        }

        Err(InstallError::DependencyUnresolvable {
            name: name.to_string(),
            reason: format!(
                "no published version satisfies '{}'",
                constraint.unwrap_or("*")
            ),
        })
    }
}

/// Parse a constraint string; `None`, empty, `*`, and `latest` all mean
/// "newest available"
fn parse_requirement(name: &str, constraint: Option<&str>) -> Result<Option<VersionReq>> {
    let raw = match constraint {
        None => return Ok(None),
        Some(raw) => raw.trim(),
    };
    if raw.is_empty() || raw == "*" || raw.eq_ignore_ascii_case("latest") {
        return Ok(None);
    }
    VersionReq::parse(raw)
        .map(Some)
        .map_err(|e| InstallError::DependencyUnresolvable {
            name: name.to_string(),
            reason: format!("invalid version constraint '{raw}': {e}"),
        })
}
