use serde::{Deserialize, Serialize};

use super::{LocationType, wire_enum};

wire_enum! {
    ProjectCategory {
        Asobi => "asobi",
        Asoto => "asoto",
    }
}

wire_enum! {
    ProjectStatus {
        Planning => "planning",
        Recruiting => "recruiting",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Cancelled => "cancelled",
        Archived => "archived",
    }
}

wire_enum! {
    ProjectVisibility {
        Public => "public",
        Private => "private",
        MembersOnly => "members_only",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    pub location_type: LocationType,
    #[serde(default)]
    pub location_detail: Option<String>,
    #[serde(default)]
    pub is_recruiting: bool,
    #[serde(default)]
    pub max_members: Option<i32>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: ProjectVisibility,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: ProjectCategory,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    pub location_type: LocationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_detail: Option<String>,
    pub is_recruiting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required_skills: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<LocationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recruiting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
}
