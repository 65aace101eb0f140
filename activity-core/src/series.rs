//! Assembly of detail records.
//!
//! A detail record is only ever cached fully assembled: a series carries a
//! defined (possibly empty) child list, anything else carries none. The
//! client runs every fetched detail through [`DetailPlan::for_detail`] and
//! only inserts what comes out of [`DetailPlan::Complete`] or
//! [`DetailPlan::attach`].

use campus_activity_types::Activity;

/// What remains to be done before a fetched detail can be cached.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPlan {
    /// Ready to cache.
    Complete(Activity),
    /// A series whose children must be fetched and attached first.
    NeedsChildren(Activity),
}

impl DetailPlan {
    /// Classify a freshly fetched detail.
    ///
    /// Children the backend may have embedded on a non-series record are
    /// dropped; a series always goes through [`DetailPlan::attach`].
    pub fn for_detail(mut detail: Activity) -> Self {
        if detail.is_series() {
            Self::NeedsChildren(detail)
        } else {
            detail.children = None;
            Self::Complete(detail)
        }
    }

    /// Attach fetched children, completing the record.
    ///
    /// A `Complete` plan is returned unchanged.
    pub fn attach(self, children: Vec<Activity>) -> Activity {
        match self {
            Self::Complete(detail) => detail,
            Self::NeedsChildren(mut parent) => {
                parent.children = Some(children);
                parent
            }
        }
    }

    /// Check a record against the assembly invariant.
    pub fn is_assembled(activity: &Activity) -> bool {
        activity.is_series() == activity.children.is_some()
    }
}
