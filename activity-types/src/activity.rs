//! Activity records.
//!
//! An [`Activity`] decodes from the backend's field names (`itemName`,
//! `itemStatus`, `st`, ...) and also accepts the snake_case names. Display
//! fields the client reads live in [`ActivityDisplay`]; every other key the
//! backend sends is kept verbatim in [`Activity::extra`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de;
use crate::time::parse_timestamp;
use crate::TypesError;

/// Category tag that marks a series container.
pub const SERIES_CATEGORY: &str = "1";

/// Lifecycle stage of an activity, as reported by `itemStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Open for registration.
    Applying,
    /// Registration closed.
    ApplyEnded,
    /// Hours under public disclosure.
    HourPublic,
    /// Appended hours under public disclosure.
    HourAppendPublic,
    /// Disclosure period over.
    PublicEnded,
    /// Hours application in progress.
    HourApplying,
    /// Hours approved.
    HourApproved,
    /// Hours rejected.
    HourRejected,
    /// Closed.
    Finished,
    /// Closed abnormally.
    AbnormalFinished,
    /// Any code outside the table.
    Unknown,
}

impl Status {
    /// Backend code for this stage (`-1` for [`Status::Unknown`]).
    pub fn code(&self) -> i32 {
        match self {
            Self::Applying => 26,
            Self::ApplyEnded => 28,
            Self::HourPublic => 30,
            Self::HourAppendPublic => 31,
            Self::PublicEnded => 32,
            Self::HourApplying => 33,
            Self::HourApproved => 34,
            Self::HourRejected => 35,
            Self::Finished => 40,
            Self::AbnormalFinished => -3,
            Self::Unknown => -1,
        }
    }

    /// Human-readable label.
    pub fn text(&self) -> &'static str {
        match self {
            Self::Applying => "registration open",
            Self::ApplyEnded => "registration closed",
            Self::HourPublic => "hours disclosure",
            Self::HourAppendPublic => "appended hours disclosure",
            Self::PublicEnded => "disclosure ended",
            Self::HourApplying => "hours applying",
            Self::HourApproved => "hours approved",
            Self::HourRejected => "hours rejected",
            Self::Finished => "closed",
            Self::AbnormalFinished => "abnormally closed",
            Self::Unknown => "unknown",
        }
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        match code {
            26 => Self::Applying,
            28 => Self::ApplyEnded,
            30 => Self::HourPublic,
            31 => Self::HourAppendPublic,
            32 => Self::PublicEnded,
            33 => Self::HourApplying,
            34 => Self::HourApproved,
            35 => Self::HourRejected,
            40 => Self::Finished,
            -3 => Self::AbnormalFinished,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Single-letter module classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleTag {
    /// Moral education (`d`).
    #[serde(rename = "d")]
    Moral,
    /// Intellectual education (`z`).
    #[serde(rename = "z")]
    Intellectual,
    /// Physical education (`t`).
    #[serde(rename = "t")]
    Physical,
    /// Aesthetic education (`m`).
    #[serde(rename = "m")]
    Aesthetic,
    /// Labor education (`l`).
    #[serde(rename = "l")]
    Labor,
}

impl ModuleTag {
    /// All five tags in table order.
    pub const ALL: [ModuleTag; 5] = [
        Self::Moral,
        Self::Intellectual,
        Self::Physical,
        Self::Aesthetic,
        Self::Labor,
    ];

    /// Backend letter for this tag.
    pub fn letter(&self) -> char {
        match self {
            Self::Moral => 'd',
            Self::Intellectual => 'z',
            Self::Physical => 't',
            Self::Aesthetic => 'm',
            Self::Labor => 'l',
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Moral => "moral",
            Self::Intellectual => "intellectual",
            Self::Physical => "physical",
            Self::Aesthetic => "aesthetic",
            Self::Labor => "labor",
        }
    }
}

impl FromStr for ModuleTag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| s.len() == 1 && s.starts_with(tag.letter()))
            .ok_or_else(|| TypesError::UnknownModule(s.to_string()))
    }
}

impl fmt::Display for ModuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Named display fields the client reads out of the backend payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDisplay {
    /// Module letter (`d`, `z`, `t`, `m`, `l`).
    #[serde(rename = "module", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Module label as rendered by the backend.
    #[serde(rename = "module_dictText", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub module_text: Option<String>,
    /// Department display name, preferred source.
    #[serde(rename = "businessDeptId_dictText", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub department_label: Option<String>,
    /// Department display name, second source.
    #[serde(rename = "businessDeptName", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    /// Department display name under a misspelled key some endpoints use.
    #[serde(rename = "bussinessDeptName", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub department_name_legacy: Option<String>,
    /// Organizer display name.
    #[serde(rename = "organizer_dictText", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Contact person.
    #[serde(rename = "linkMan", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub link_man: Option<String>,
    /// Venue.
    #[serde(rename = "placeInfo", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Header image reference.
    #[serde(rename = "pic", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Participation form label.
    #[serde(rename = "form_dictText", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    /// Activity level label.
    #[serde(rename = "activityLevel_dictText", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// An activity as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Primary key.
    pub id: String,
    /// Display name.
    #[serde(rename = "itemName", alias = "name")]
    pub name: String,
    /// Raw status code, see [`Status`].
    #[serde(rename = "itemStatus", alias = "status_code", deserialize_with = "de::int")]
    pub status_code: i32,
    /// Hours granted on completion.
    #[serde(rename = "validHour", alias = "valid_hour", default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub valid_hours: Option<f64>,
    /// Number of registered applicants.
    #[serde(rename = "applyNum", alias = "apply_num", default, deserialize_with = "de::opt_i64", skip_serializing_if = "Option::is_none")]
    pub applicant_count: Option<i64>,
    /// Applicant cap.
    #[serde(rename = "peopleNum", alias = "apply_limit", default, deserialize_with = "de::opt_i64", skip_serializing_if = "Option::is_none")]
    pub applicant_limit: Option<i64>,
    /// `1` when the current user is registered.
    #[serde(rename = "booleanRegistration", alias = "boolean_registration", default, deserialize_with = "de::opt_i64", skip_serializing_if = "Option::is_none")]
    pub registration_flag: Option<i64>,
    /// `"1"` when registration requires sign-up details.
    #[serde(rename = "needSignInfo", alias = "need_sign_info_str", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub need_sign_info: Option<String>,
    /// Conceiving rationale.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub conceive: Option<String>,
    /// Body text.
    #[serde(rename = "baseContent", alias = "base_content", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Category tag; [`SERIES_CATEGORY`] marks a series.
    #[serde(rename = "itemCategory", alias = "item_category", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Creation timestamp.
    #[serde(rename = "createTime", alias = "create_time_str", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Registration window start.
    #[serde(rename = "applySt", alias = "apply_start", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub apply_start: Option<String>,
    /// Registration window end.
    #[serde(rename = "applyEt", alias = "apply_end", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub apply_end: Option<String>,
    /// Start of the activity itself.
    #[serde(rename = "st", alias = "start_time", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End of the activity itself.
    #[serde(rename = "et", alias = "end_time", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Contact phone.
    #[serde(rename = "tel", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Child activities; only ever set on a series after a detail fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Activity>>,
    /// Display fields.
    #[serde(flatten)]
    pub display: ActivityDisplay,
    /// Every other key in the backend payload, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Create a bare activity with only the required fields set.
    pub fn new(id: &str, name: &str, status_code: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status_code,
            valid_hours: None,
            applicant_count: None,
            applicant_limit: None,
            registration_flag: None,
            need_sign_info: None,
            conceive: None,
            content: None,
            category: None,
            created_at: None,
            apply_start: None,
            apply_end: None,
            start_time: None,
            end_time: None,
            contact: None,
            children: None,
            display: ActivityDisplay::default(),
            extra: Map::new(),
        }
    }

    /// Lifecycle stage.
    pub fn status(&self) -> Status {
        Status::from(self.status_code)
    }

    /// True for a series container.
    pub fn is_series(&self) -> bool {
        self.category.as_deref() == Some(SERIES_CATEGORY)
    }

    /// True if the current user is registered.
    pub fn applied(&self) -> bool {
        self.registration_flag.unwrap_or(0) == 1
    }

    /// True if registration is open, the user is not registered and seats remain.
    pub fn applyable(&self) -> bool {
        self.status() == Status::Applying
            && !self.applied()
            && self.applicant_count.unwrap_or(0) < self.applicant_limit.unwrap_or(0)
    }

    /// True if registering requires sign-up details.
    pub fn needs_sign_info(&self) -> bool {
        self.need_sign_info.as_deref() == Some("1")
    }

    /// Module classification, if the backend reported a known letter.
    pub fn module_tag(&self) -> Option<ModuleTag> {
        self.display.module.as_deref()?.parse().ok()
    }

    /// Department display name, or `""` when none of the sources is set.
    pub fn department_name(&self) -> &str {
        [
            &self.display.department_label,
            &self.display.department_name,
            &self.display.department_name_legacy,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
    }

    /// Organizer display name, falling back to the contact person.
    pub fn organizer_name(&self) -> &str {
        [&self.display.organizer, &self.display.link_man]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }

    /// Parsed start time; `None` if absent or unparseable.
    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.start_time.as_deref()?).ok()
    }

    /// Parsed end time; `None` if absent or unparseable.
    pub fn end(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.end_time.as_deref()?).ok()
    }
}
