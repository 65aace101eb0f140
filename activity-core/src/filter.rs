//! Local catalog filter.
//!
//! [`ActivityFilter`] is a plain value: applying it never mutates the
//! catalog, never reaches the backend, and never looks inside `children`.
//! Every dimension is independent and an empty value means "no constraint",
//! so the default filter is the identity.

use std::collections::BTreeSet;

use campus_activity_types::{Activity, ModuleTag};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Criteria for narrowing the catalog on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFilter {
    /// Case-insensitive substring over the activity's text fields.
    pub keyword: String,
    /// Accepted module tags; empty accepts every activity.
    pub modules: BTreeSet<ModuleTag>,
    /// Case-insensitive substring of the department name.
    pub department: String,
    /// Case-insensitive substring of the organizer name.
    pub organizer: String,
    /// Activities must start at or after this instant.
    pub start_after: Option<NaiveDateTime>,
    /// Activities must end strictly before this instant.
    pub end_before: Option<NaiveDateTime>,
}

impl ActivityFilter {
    /// The identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keyword = keyword.to_string();
        self
    }

    /// Add an accepted module tag.
    pub fn with_module(mut self, module: ModuleTag) -> Self {
        self.modules.insert(module);
        self
    }

    /// Set the department substring.
    pub fn with_department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    /// Set the organizer substring.
    pub fn with_organizer(mut self, organizer: &str) -> Self {
        self.organizer = organizer.to_string();
        self
    }

    /// Set the inclusive start bound.
    pub fn with_start_after(mut self, bound: NaiveDateTime) -> Self {
        self.start_after = Some(bound);
        self
    }

    /// Set the exclusive end bound.
    pub fn with_end_before(mut self, bound: NaiveDateTime) -> Self {
        self.end_before = Some(bound);
        self
    }

    /// True if no dimension constrains anything.
    pub fn is_identity(&self) -> bool {
        self.keyword.trim().is_empty()
            && self.modules.is_empty()
            && self.department.trim().is_empty()
            && self.organizer.trim().is_empty()
            && self.start_after.is_none()
            && self.end_before.is_none()
    }

    /// Check a single activity against every dimension.
    pub fn matches(&self, activity: &Activity) -> bool {
        if !self.keyword.trim().is_empty() && !keyword_hit(activity, &self.keyword) {
            return false;
        }

        if !self.modules.is_empty() {
            match activity.module_tag() {
                Some(tag) if self.modules.contains(&tag) => {}
                _ => return false,
            }
        }

        if !contains_ci(activity.department_name(), &self.department) {
            return false;
        }
        if !contains_ci(activity.organizer_name(), &self.organizer) {
            return false;
        }

        // Date bounds are skipped for activities missing the timestamp.
        if let (Some(bound), Some(start)) = (self.start_after, activity.start()) {
            if start < bound {
                return false;
            }
        }
        if let (Some(bound), Some(end)) = (self.end_before, activity.end()) {
            if end >= bound {
                return false;
            }
        }

        true
    }

    /// Filter a catalog, preserving its order.
    pub fn apply(&self, catalog: &[Activity]) -> Vec<Activity> {
        catalog
            .iter()
            .filter(|activity| self.matches(activity))
            .cloned()
            .collect()
    }
}

fn keyword_hit(activity: &Activity, keyword: &str) -> bool {
    let fields = [
        Some(activity.name.as_str()),
        activity.content.as_deref(),
        activity.conceive.as_deref(),
        activity.display.place.as_deref(),
        Some(activity.department_name()),
        Some(activity.organizer_name()),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| contains_ci(field, keyword))
}

/// Case-insensitive substring test; a blank needle always matches.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
