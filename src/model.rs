//! Data models for Metabase entities and report rows.
//!
//! The API payload types deserialize the subset of each response that the
//! reports need; unknown fields are ignored. The report row types implement
//! [`TsvRecordProducer`](crate::report::TsvRecordProducer) so the report
//! writer can serialize them without knowing their shape.

use crate::report::TsvRecordProducer;
use serde::Deserialize;

/// Item type tag marking a nested collection in a collection listing
pub const MODEL_COLLECTION: &str = "collection";
/// Name of the implicit group every Metabase user belongs to
pub const ALL_USERS_GROUP_NAME: &str = "All Users";

/// A permission group as returned by `GET /api/permissions/group`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

impl Group {
    /// True for the built-in "All Users" pseudo-group, which is excluded
    /// from the permissions report
    pub fn is_all_users(&self) -> bool {
        self.name == ALL_USERS_GROUP_NAME
    }
}

/// Detail payload of `GET /api/permissions/group/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupDetail {
    #[serde(default)]
    pub members: Vec<Member>,
}

/// One member of a permission group
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    pub email: String,
}

/// Metadata payload of `GET /api/collection/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Collection {
    pub name: String,
}

/// Listing payload of `GET /api/collection/{id}/items`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionItemList {
    pub data: Vec<CollectionItem>,
}

/// One entry of a collection listing, either a nested collection or a leaf
/// content object such as a saved question or dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionItem {
    pub id: u64,
    pub name: String,
    pub model: String,
    #[serde(rename = "last-edit-info")]
    pub last_edit_info: Option<LastEditInfo>,
}

impl CollectionItem {
    pub fn is_collection(&self) -> bool {
        self.model == MODEL_COLLECTION
    }
}

/// Last-edit annotation attached to leaf items
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LastEditInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub timestamp: String,
}

/// One row of the permissions report: a (group, member) pair
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionRecord {
    group: String,
    user: String,
}

impl PermissionRecord {
    pub fn new(group: String, user: String) -> PermissionRecord {
        PermissionRecord { group, user }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl TsvRecordProducer for PermissionRecord {
    fn tsv_header() -> Vec<String> {
        vec!["group".to_string(), "user".to_string()]
    }

    fn as_tsv_record(&self) -> Vec<String> {
        vec![self.group.clone(), self.user.clone()]
    }
}

/// One row of the queries report: a leaf item annotated with the ids and
/// names of every collection between the root and its direct parent
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    id: u64,
    name: String,
    link: String,
    ancestor_ids: String,
    ancestor_names: String,
    last_edited_by: String,
    last_edited_at: String,
}

impl QueryRecord {
    /// Build a report row from a leaf collection item.
    ///
    /// The link points at the item in the Metabase UI; items that were never
    /// edited carry empty last-edit columns.
    pub fn from_item(
        item: CollectionItem,
        base_url: &str,
        ancestor_ids: &str,
        ancestor_names: &str,
    ) -> QueryRecord {
        let link = format!("{}/{}/{}", base_url, item.model, item.id);
        let last_edit = item.last_edit_info.unwrap_or_default();

        QueryRecord {
            id: item.id,
            name: item.name,
            link,
            ancestor_ids: ancestor_ids.to_string(),
            ancestor_names: ancestor_names.to_string(),
            last_edited_by: last_edit.email,
            last_edited_at: last_edit.timestamp,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn ancestor_ids(&self) -> &str {
        &self.ancestor_ids
    }

    pub fn ancestor_names(&self) -> &str {
        &self.ancestor_names
    }

    pub fn last_edited_by(&self) -> &str {
        &self.last_edited_by
    }

    pub fn last_edited_at(&self) -> &str {
        &self.last_edited_at
    }
}

impl TsvRecordProducer for QueryRecord {
    fn tsv_header() -> Vec<String> {
        vec![
            "id".to_string(),
            "name".to_string(),
            "link".to_string(),
            "ancestor_ids".to_string(),
            "ancestor_names".to_string(),
            "last_edited_by".to_string(),
            "last_edited_at".to_string(),
        ]
    }

    fn as_tsv_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.link.clone(),
            self.ancestor_ids.clone(),
            self.ancestor_names.clone(),
            self.last_edited_by.clone(),
            self.last_edited_at.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_all_users_detection() {
        let all_users = Group {
            id: 1,
            name: "All Users".to_string(),
        };
        let admins = Group {
            id: 2,
            name: "Admins".to_string(),
        };

        assert!(all_users.is_all_users());
        assert!(!admins.is_all_users());
    }

    #[test]
    fn test_collection_item_deserialization() {
        let json = r#"{
            "id": 9,
            "name": "Sales",
            "model": "card",
            "collection_position": null,
            "last-edit-info": {
                "id": 42,
                "email": "b@x.com",
                "timestamp": "2024-01-01"
            }
        }"#;

        let item: CollectionItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 9);
        assert_eq!(item.name, "Sales");
        assert!(!item.is_collection());

        let last_edit = item.last_edit_info.unwrap();
        assert_eq!(last_edit.email, "b@x.com");
        assert_eq!(last_edit.timestamp, "2024-01-01");
    }

    #[test]
    fn test_collection_item_without_edit_info() {
        let json = r#"{"id": 5, "name": "Reports", "model": "collection"}"#;

        let item: CollectionItem = serde_json::from_str(json).unwrap();
        assert!(item.is_collection());
        assert!(item.last_edit_info.is_none());
    }

    #[test]
    fn test_query_record_from_item() {
        let item = CollectionItem {
            id: 9,
            name: "Sales".to_string(),
            model: "card".to_string(),
            last_edit_info: Some(LastEditInfo {
                email: "b@x.com".to_string(),
                timestamp: "2024-01-01".to_string(),
            }),
        };

        let record =
            QueryRecord::from_item(item, "https://metabase.example.com", "/5", "/Reports");

        assert_eq!(record.link(), "https://metabase.example.com/card/9");
        assert_eq!(record.ancestor_ids(), "/5");
        assert_eq!(record.ancestor_names(), "/Reports");
        assert_eq!(record.last_edited_by(), "b@x.com");
        assert_eq!(record.last_edited_at(), "2024-01-01");
    }

    #[test]
    fn test_query_record_without_edit_info_uses_empty_columns() {
        let item = CollectionItem {
            id: 3,
            name: "Orphan".to_string(),
            model: "dashboard".to_string(),
            last_edit_info: None,
        };

        let record = QueryRecord::from_item(item, "https://metabase.example.com", "", "");

        assert_eq!(record.link(), "https://metabase.example.com/dashboard/3");
        assert_eq!(record.last_edited_by(), "");
        assert_eq!(record.last_edited_at(), "");
    }
}
