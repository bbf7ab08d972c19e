//! Collection assembly: version folders containing group folders containing
//! request items.

use crate::classifier::ClassifiedRoute;
use crate::config::POSTMAN_SCHEMA_URL;
use crate::request::RequestItem;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Collection metadata (`info`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    /// Random per-export identifier
    #[serde(rename = "_postman_id")]
    pub postman_id: String,
    pub schema: String,
}

/// A named folder of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder<T> {
    pub name: String,
    pub item: Vec<T>,
}

/// The exported document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDocument {
    pub info: Info,
    /// Version folders, each holding group folders
    pub item: Vec<Folder<Folder<RequestItem>>>,
}

impl CollectionDocument {
    /// Total number of request items across all folders
    pub fn request_count(&self) -> usize {
        self.item
            .iter()
            .flat_map(|version| version.item.iter())
            .map(|group| group.item.len())
            .sum()
    }

    pub fn version(&self, name: &str) -> Option<&Folder<Folder<RequestItem>>> {
        self.item.iter().find(|folder| folder.name == name)
    }
}

/// Groups request items by version, then by group.
///
/// Folders appear in the order their first route was added, and requests
/// within a folder keep insertion order.
pub struct CollectionAssembler {
    info: Info,
    folders: IndexMap<String, IndexMap<String, Vec<RequestItem>>>,
}

impl CollectionAssembler {
    /// Starts a collection with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(name, uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(name: impl Into<String>, postman_id: impl Into<String>) -> Self {
        Self {
            info: Info {
                name: name.into(),
                postman_id: postman_id.into(),
                schema: POSTMAN_SCHEMA_URL.to_string(),
            },
            folders: IndexMap::new(),
        }
    }

    pub fn add(&mut self, route: &ClassifiedRoute, item: RequestItem) {
        debug!("Filing {} under {}/{}", item.name, route.version, route.group);
        self.folders
            .entry(route.version.clone())
            .or_default()
            .entry(route.group.clone())
            .or_default()
            .push(item);
    }

    pub fn build(self) -> CollectionDocument {
        let item = self
            .folders
            .into_iter()
            .map(|(version, groups)| Folder {
                name: version,
                item: groups
                    .into_iter()
                    .map(|(group, requests)| Folder {
                        name: group,
                        item: requests,
                    })
                    .collect(),
            })
            .collect();

        CollectionDocument {
            info: self.info,
            item,
        }
    }
}
