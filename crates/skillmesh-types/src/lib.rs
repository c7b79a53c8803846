//! Shared data model and wire payload types for skillmesh
//!
//! Every type that crosses the registry wire lives here so that the store,
//! the client, and the installer agree on one schema:
//!
//! - **Records**: [`SkillVersion`], [`SkillDependency`], [`DownloadEvent`]
//! - **Requests**: [`RegistryRequest`] envelope plus per-action parameter
//!   structs
//! - **Replies**: search/list/get/version-history payloads, write
//!   acknowledgments, in-band error replies, and registry introspection
//! - **Stats**: [`TimeRange`] and the conditionally shaped
//!   [`AggregateStats`]/[`SkillStats`] replies, where field presence is
//!   encoded in the variant rather than in `Option` fields
//!
//! Wire JSON uses camelCase field names throughout.

pub mod envelope;
pub mod event;
pub mod params;
pub mod reply;
pub mod skill;
pub mod stats;

pub use envelope::{actions, RegistryRequest};
pub use event::DownloadEvent;
pub use params::{
    GetSkillParams, ListParams, RecordDownloadParams, RegisterSkillParams, SearchParams,
    StatsParams,
};
pub use reply::{
    AckReply, ErrorReply, InfoReply, ListReply, Pagination, ProcessInfo, SearchReply, SkillReply,
    VersionHistoryReply, STATUS_ERROR, STATUS_SUCCESS,
};
pub use skill::{is_valid_skill_name, SkillDependency, SkillVersion};
pub use stats::{AggregateStats, SkillStats, TimeRange, WINDOW_30_DAYS_MS, WINDOW_7_DAYS_MS};
