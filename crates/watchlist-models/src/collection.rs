use serde::{Deserialize, Serialize};
use crate::category::Category;
use crate::item::ItemRecord;

/// The five category lists owned by one identity
///
/// Each list is ordered most-recently-added first. Mutations through
/// [`ListCollection::upsert`] keep an imdb id in at most one list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListCollection {
    #[serde(default)]
    pub watched: Vec<ItemRecord>,
    #[serde(default)]
    pub watching: Vec<ItemRecord>,
    #[serde(default)]
    pub planned: Vec<ItemRecord>,
    #[serde(default)]
    pub onhold: Vec<ItemRecord>,
    #[serde(default)]
    pub dropped: Vec<ItemRecord>,
}

impl ListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &[ItemRecord] {
        match category {
            Category::Watched => &self.watched,
            Category::Watching => &self.watching,
            Category::Planned => &self.planned,
            Category::Onhold => &self.onhold,
            Category::Dropped => &self.dropped,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<ItemRecord> {
        match category {
            Category::Watched => &mut self.watched,
            Category::Watching => &mut self.watching,
            Category::Planned => &mut self.planned,
            Category::Onhold => &mut self.onhold,
            Category::Dropped => &mut self.dropped,
        }
    }

    /// Iterate every item tagged with the list it lives in
    pub fn iter(&self) -> impl Iterator<Item = (Category, &ItemRecord)> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.get(category).iter().map(move |item| (category, item)))
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn category_of(&self, imdb_id: &str) -> Option<Category> {
        self.iter()
            .find(|(_, item)| item.same_item(imdb_id))
            .map(|(category, _)| category)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.category_of(imdb_id).is_some()
    }

    /// Remove an id from a single list, keeping the order of the rest
    ///
    /// Returns how many entries were dropped.
    pub fn remove_from(&mut self, category: Category, imdb_id: &str) -> usize {
        let list = self.get_mut(category);
        let before = list.len();
        list.retain(|item| !item.same_item(imdb_id));
        before - list.len()
    }

    /// Remove an id from every list
    pub fn remove_everywhere(&mut self, imdb_id: &str) -> usize {
        Category::ALL
            .into_iter()
            .map(|category| self.remove_from(category, imdb_id))
            .sum()
    }

    /// Move (or add) an item to the head of `category`
    ///
    /// Any earlier occurrence of the same id, in any list, is removed first.
    pub fn upsert(&mut self, category: Category, item: ItemRecord) {
        self.remove_everywhere(&item.imdb_id);
        self.get_mut(category).insert(0, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(imdb_id: &str) -> ItemRecord {
        ItemRecord::new(imdb_id, format!("Movie {}", imdb_id), Utc::now())
    }

    #[test]
    fn test_upsert_inserts_at_head() {
        let mut lists = ListCollection::new();
        lists.upsert(Category::Planned, item("tt001"));
        lists.upsert(Category::Planned, item("tt002"));

        let ids: Vec<&str> = lists.planned.iter().map(|i| i.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt002", "tt001"]);
    }

    #[test]
    fn test_upsert_moves_between_lists() {
        let mut lists = ListCollection::new();
        lists.upsert(Category::Planned, item("tt001"));
        lists.upsert(Category::Watched, item("tt001"));

        assert!(lists.planned.is_empty());
        assert_eq!(lists.watched.len(), 1);
        assert_eq!(lists.category_of("tt001"), Some(Category::Watched));
    }

    #[test]
    fn test_upsert_same_list_keeps_single_copy() {
        let mut lists = ListCollection::new();
        lists.upsert(Category::Watching, item("tt001"));
        lists.upsert(Category::Watching, item("tt002"));
        lists.upsert(Category::Watching, item("tt001"));

        let ids: Vec<&str> = lists.watching.iter().map(|i| i.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002"]);
    }

    #[test]
    fn test_remove_from_preserves_order() {
        let mut lists = ListCollection::new();
        for id in ["tt003", "tt002", "tt001"] {
            lists.upsert(Category::Dropped, item(id));
        }

        assert_eq!(lists.remove_from(Category::Dropped, "tt002"), 1);
        let ids: Vec<&str> = lists.dropped.iter().map(|i| i.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt003"]);
    }

    #[test]
    fn test_remove_from_other_list_is_noop() {
        let mut lists = ListCollection::new();
        lists.upsert(Category::Onhold, item("tt001"));

        assert_eq!(lists.remove_from(Category::Watched, "tt001"), 0);
        assert!(lists.contains("tt001"));
    }

    #[test]
    fn test_iter_tags_category() {
        let mut lists = ListCollection::new();
        lists.upsert(Category::Watched, item("tt001"));
        lists.upsert(Category::Dropped, item("tt002"));

        let tagged: Vec<(Category, &str)> = lists
            .iter()
            .map(|(c, i)| (c, i.imdb_id.as_str()))
            .collect();
        assert_eq!(
            tagged,
            vec![(Category::Watched, "tt001"), (Category::Dropped, "tt002")]
        );
        assert_eq!(lists.len(), 2);
    }
}
