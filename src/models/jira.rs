use serde::{Deserialize, Serialize};

/// Issue detail attached to Jira results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssue {
    pub project: Project,
    pub issue_type: IssueType,
    #[serde(default)]
    pub assignee: Option<User>,
    pub status: Status,
    #[serde(default)]
    pub components: Option<Vec<Component>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl JiraIssue {
    /// Component names joined for display
    pub fn component_names(&self) -> Vec<&str> {
        self.components
            .iter()
            .flatten()
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub key: String,
    pub avatar_urls: AvatarUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarUrls {
    #[serde(rename = "16x16")]
    pub small: String,
}
