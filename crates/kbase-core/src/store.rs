//! Read-only corpus store.
//!
//! Loaded once at start-up from a JSON array of [`KnowledgeItem`] records and
//! shared by reference afterwards. Any schema problem fails the whole load.
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use tracing::{info, warn};
use twox_hash::XxHash64;

use crate::error::{Error, Result};
use crate::types::{Category, KnowledgeItem};

#[derive(Debug, Clone)]
pub struct DocumentStore {
    items: Vec<KnowledgeItem>,
    by_id: HashMap<String, usize>,
    source_hash: String,
}

impl DocumentStore {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::corpus(path, e))?;
        let items: Vec<KnowledgeItem> = serde_json::from_slice(&bytes).map_err(|e| Error::corpus(path, e))?;
        let store = Self::validated(items).map_err(|reason| Error::corpus(path, reason))?;
        info!(documents = store.len(), path = %path.display(), "loaded corpus");
        Ok(store)
    }

    /// Build from records already in memory, with the same validation as [`load`](Self::load).
    pub fn from_items(items: Vec<KnowledgeItem>) -> Result<Self> {
        Self::validated(items).map_err(|reason| Error::corpus("<memory>", reason))
    }

    fn validated(items: Vec<KnowledgeItem>) -> std::result::Result<Self, String> {
        let mut by_id = HashMap::with_capacity(items.len());
        let mut hasher = XxHash64::with_seed(0);
        for (pos, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                warn!(position = pos, "corpus record without id");
                return Err(format!("record {pos} has an empty id"));
            }
            if by_id.insert(item.id.clone(), pos).is_some() {
                warn!(id = %item.id, "duplicate corpus id");
                return Err(format!("duplicate id '{}'", item.id));
            }
            item.id.hash(&mut hasher);
            item.title.hash(&mut hasher);
            item.url.hash(&mut hasher);
            item.category.hash(&mut hasher);
            item.summary.hash(&mut hasher);
            item.content.hash(&mut hasher);
        }
        Ok(Self { items, by_id, source_hash: format!("{:016x}", hasher.finish()) })
    }

    pub fn items(&self) -> &[KnowledgeItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeItem> {
        self.by_id.get(id).map(|&pos| &self.items[pos])
    }

    pub fn by_category(&self, category: Category) -> Vec<&KnowledgeItem> {
        self.items.iter().filter(|item| item.category == category).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Content fingerprint of the corpus; changes whenever any record changes.
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category) -> KnowledgeItem {
        KnowledgeItem {
            id: id.into(),
            title: format!("Title {id}"),
            url: format!("https://example.com/{id}"),
            category,
            summary: "summary".into(),
            content: "content".into(),
        }
    }

    #[test]
    fn lookup_and_category_filter() {
        let store = DocumentStore::from_items(vec![
            item("a", Category::Pricing),
            item("b", Category::Security),
            item("c", Category::Pricing),
        ])
        .unwrap();
        assert_eq!(store.get("b").unwrap().category, Category::Security);
        assert!(store.get("zzz").is_none());
        let ids: Vec<_> = store.by_category(Category::Pricing).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        let dup = DocumentStore::from_items(vec![item("a", Category::Product), item("a", Category::Product)]);
        assert!(matches!(dup, Err(Error::CorpusUnavailable { .. })));
        let empty = DocumentStore::from_items(vec![item(" ", Category::Product)]);
        assert!(matches!(empty, Err(Error::CorpusUnavailable { .. })));
    }

    #[test]
    fn hash_tracks_content() {
        let a = DocumentStore::from_items(vec![item("a", Category::Product)]).unwrap();
        let mut changed = item("a", Category::Product);
        changed.content = "different".into();
        let b = DocumentStore::from_items(vec![changed]).unwrap();
        assert_ne!(a.source_hash(), b.source_hash());
        assert_eq!(a.source_hash().len(), 16);
    }
}
