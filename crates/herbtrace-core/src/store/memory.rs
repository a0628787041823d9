//! In-process object store.

use tokio::sync::RwLock;

use super::{ObjectPage, ObjectStore, StoreError, StoredObject};

/// Object store kept in memory, in insertion order.
///
/// Contents vanish with the process. Used when no hosted store is configured
/// and as the store behind tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<Vec<StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all types.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl ObjectStore for MemoryStore {
    async fn create_object(
        &self,
        object_type: &str,
        data: serde_json::Value,
    ) -> Result<StoredObject, StoreError> {
        let object = StoredObject {
            object_id: uuid::Uuid::new_v4().to_string(),
            object_type: object_type.to_string(),
            object_data: data,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        self.objects.write().await.push(object.clone());
        Ok(object)
    }

    async fn list_objects(
        &self,
        object_type: &str,
        limit: u32,
        newest_first: bool,
    ) -> Result<ObjectPage, StoreError> {
        let objects = self.objects.read().await;
        let matching: Vec<&StoredObject> = objects
            .iter()
            .filter(|o| o.object_type == object_type)
            .collect();
        let total = matching.len();
        let limit = limit as usize;

        let items: Vec<StoredObject> = if newest_first {
            matching.into_iter().rev().take(limit).cloned().collect()
        } else {
            matching.into_iter().take(limit).cloned().collect()
        };

        let next_page_token = (total > limit).then(|| limit.to_string());
        Ok(ObjectPage {
            items,
            next_page_token,
        })
    }
}
