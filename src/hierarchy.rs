//! Collection hierarchy traversal.
//!
//! Walks the collection tree depth-first in pre-order and flattens every
//! leaf content item (saved question, dashboard, ...) into a report row
//! annotated with the slash-joined ids and names of its ancestor
//! collections. The reserved root collection never contributes a path
//! segment, so a leaf stored directly under the root has empty ancestor
//! columns.

use crate::metabase::{ApiError, CollectionSource};
use crate::model::QueryRecord;
use futures::future::{FutureExt, LocalBoxFuture};
use std::collections::HashSet;
use tracing::trace;

/// Reserved id of the top-level collection
pub const ROOT_COLLECTION_ID: &str = "root";

#[derive(Debug, thiserror::Error)]
pub enum TraversalError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
    #[error("cycle detected in collection hierarchy at collection {collection_id:?}")]
    CycleDetected { collection_id: String },
}

/// Collect every leaf item reachable from the given collection.
///
/// Children are visited in the order the listing endpoint returns them, so
/// the report order follows the source order. The hierarchy is expected to
/// be a tree; a collection listed under two parents (or a genuine cycle)
/// aborts the traversal with [`TraversalError::CycleDetected`] instead of
/// recursing without bound.
pub async fn collect_leaf_items<S>(
    source: &S,
    collection_id: &str,
) -> Result<Vec<QueryRecord>, TraversalError>
where
    S: CollectionSource,
{
    let mut visited = HashSet::new();
    let mut records = Vec::new();
    walk(
        source,
        collection_id.to_string(),
        String::new(),
        String::new(),
        &mut visited,
        &mut records,
    )
    .await?;

    Ok(records)
}

/// One traversal step: fetch the collection's metadata and children, extend
/// the ancestor paths, record leaves, and recurse into nested collections.
///
/// The accumulators are threaded through every call explicitly; nothing is
/// shared between separate traversal runs.
fn walk<'a, S>(
    source: &'a S,
    collection_id: String,
    ancestor_ids: String,
    ancestor_names: String,
    visited: &'a mut HashSet<String>,
    records: &'a mut Vec<QueryRecord>,
) -> LocalBoxFuture<'a, Result<(), TraversalError>>
where
    S: CollectionSource,
{
    async move {
        if !visited.insert(collection_id.clone()) {
            return Err(TraversalError::CycleDetected { collection_id });
        }

        let collection = source.collection(&collection_id).await?;
        let children = source.collection_items(&collection_id).await?;
        trace!(
            "Visiting collection {} ({:?}, {} children)",
            collection_id,
            collection.name,
            children.len()
        );

        // The root is never part of any ancestor path
        let (ancestor_ids, ancestor_names) = if collection_id == ROOT_COLLECTION_ID {
            (ancestor_ids, ancestor_names)
        } else {
            (
                format!("{}/{}", ancestor_ids, collection_id),
                format!("{}/{}", ancestor_names, collection.name),
            )
        };

        for item in children {
            if item.is_collection() {
                walk(
                    source,
                    item.id.to_string(),
                    ancestor_ids.clone(),
                    ancestor_names.clone(),
                    visited,
                    records,
                )
                .await?;
            } else {
                records.push(QueryRecord::from_item(
                    item,
                    source.base_url(),
                    &ancestor_ids,
                    &ancestor_names,
                ));
            }
        }

        Ok(())
    }
    .boxed_local()
}
