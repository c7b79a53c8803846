//! Search and listing over the latest version of each skill

use skillmesh_types::{ListParams, ListReply, Pagination, SearchParams, SearchReply, SkillVersion};

use crate::store::RegistryStore;

/// Default page size for `List`
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Upper bound a caller can request per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// `Search`: case-insensitive match over name, description, and tags
///
/// Exact name matches come before substring matches; within each group
/// results keep registry name order. An empty query matches everything.
pub fn search(store: &RegistryStore, params: &SearchParams) -> SearchReply {
    let needle = params.query.trim().to_lowercase();

    let mut exact: Vec<SkillVersion> = Vec::new();
    let mut partial: Vec<SkillVersion> = Vec::new();
    for skill in store.latest_versions() {
        if needle.is_empty() {
            partial.push(skill.clone());
            continue;
        }
        if skill.name.to_lowercase() == needle {
            exact.push(skill.clone());
        } else if matches_query(skill, &needle) {
            partial.push(skill.clone());
        }
    }

    let mut results = exact;
    results.append(&mut partial);
    let total = results.len() as u64;

    if let Some(limit) = params.limit {
        results.truncate(limit as usize);
    }

    SearchReply {
        results,
        total,
        query: params.query.clone(),
    }
}

fn matches_query(skill: &SkillVersion, needle: &str) -> bool {
    skill.name.to_lowercase().contains(needle)
        || skill.description.to_lowercase().contains(needle)
        || skill.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// `List`: filtered, paginated latest-version listing
pub fn list(store: &RegistryStore, params: &ListParams) -> ListReply {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0);

    let filtered: Vec<&SkillVersion> = store
        .latest_versions()
        .into_iter()
        .filter(|skill| matches_filters(skill, params))
        .collect();

    let total = filtered.len() as u64;
    let skills: Vec<SkillVersion> = filtered
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect();
    let returned = skills.len() as u64;

    ListReply {
        skills,
        pagination: Pagination {
            total,
            limit,
            offset,
            returned,
            has_next_page: offset + returned < total,
            has_prev_page: offset > 0,
        },
    }
}

fn matches_filters(skill: &SkillVersion, params: &ListParams) -> bool {
    if let Some(author) = &params.author {
        if !skill.author.eq_ignore_ascii_case(author) {
            return false;
        }
    }
    if let Some(tags) = &params.filter_tags {
        // AND logic: every requested tag must be present
        let has_all = tags.iter().all(|wanted| {
            skill
                .tags
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case(wanted))
        });
        if !has_all {
            return false;
        }
    }
    if let Some(fragment) = &params.filter_name {
        if !skill
            .name
            .to_lowercase()
            .contains(&fragment.to_lowercase())
        {
            return false;
        }
    }
    true
}
