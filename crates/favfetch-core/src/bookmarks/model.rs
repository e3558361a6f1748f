//! Typed access over the bookmarks JSON document.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

/// Field holding the icon reference on each item.
pub const FAVICON_FIELD: &str = "favicon";
const TITLE_FIELD: &str = "title";
const ITEMS_FIELD: &str = "items";

/// Where an item's icon currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef<'a> {
    /// Absolute `http`/`https` URL still to be fetched.
    Remote(&'a str),
    /// Anything else, typically a path written by a previous run.
    Local(&'a str),
}

impl<'a> IconRef<'a> {
    pub fn classify(value: &'a str) -> Self {
        match Url::parse(value.trim()) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => {
                IconRef::Remote(value.trim())
            }
            _ => IconRef::Local(value),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, IconRef::Remote(_))
    }
}

/// One bookmark. Only `title` and `favicon` are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    fields: Map<String, Value>,
}

impl Item {
    pub fn new(title: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(TITLE_FIELD.to_string(), Value::String(title.to_string()));
        Self { fields }
    }

    pub fn with_favicon(mut self, favicon: &str) -> Self {
        self.set_favicon(favicon);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get(TITLE_FIELD).and_then(Value::as_str)
    }

    /// Raw icon reference. Empty strings count as absent.
    pub fn favicon(&self) -> Option<&str> {
        self.fields
            .get(FAVICON_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn icon_ref(&self) -> Option<IconRef<'_>> {
        self.favicon().map(IconRef::classify)
    }

    /// Replace the icon reference. An existing field keeps its position.
    pub fn set_favicon(&mut self, value: &str) {
        self.fields
            .insert(FAVICON_FIELD.to_string(), Value::String(value.to_string()));
    }
}

/// A named group of items. `items` is typed; every other field passes through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    fields: Map<String, Value>,
    items: Vec<Item>,
    /// Position of `items` among the original keys (None if it was absent).
    items_pos: Option<usize>,
}

impl Category {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            fields: Map::new(),
            items,
            items_pos: Some(0),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.items_pos.is_some());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        let mut emitted = self.items_pos.is_none();
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if !emitted && self.items_pos == Some(i) {
                map.serialize_entry(ITEMS_FIELD, &self.items)?;
                emitted = true;
            }
            map.serialize_entry(k, v)?;
        }
        if !emitted {
            map.serialize_entry(ITEMS_FIELD, &self.items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut fields = Map::new();
        let mut items = Vec::new();
        let mut items_pos = None;
        for (k, v) in raw {
            if k == ITEMS_FIELD {
                items_pos = Some(fields.len());
                items = match v {
                    Value::Null => Vec::new(),
                    v => serde_json::from_value(v).map_err(D::Error::custom)?,
                };
            } else {
                fields.insert(k, v);
            }
        }
        Ok(Category {
            fields,
            items,
            items_pos,
        })
    }
}

/// The whole document: an ordered list of categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkCollection {
    categories: Vec<Category>,
}

impl BookmarkCollection {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Iterate `(category index, item index, item)` in document order.
    pub fn items(&self) -> impl Iterator<Item = (usize, usize, &Item)> + '_ {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(c, cat)| cat.items.iter().enumerate().map(move |(i, item)| (c, i, item)))
    }

    pub fn item_mut(&mut self, category: usize, item: usize) -> Option<&mut Item> {
        self.categories.get_mut(category)?.items.get_mut(item)
    }

    /// Set the icon reference on every item whose title equals `title`.
    /// Returns how many items were changed.
    pub fn set_favicon_by_title(&mut self, title: &str, value: &str) -> usize {
        let mut changed = 0;
        for cat in &mut self.categories {
            for item in cat.items.iter_mut().filter(|i| i.title() == Some(title)) {
                item.set_favicon(value);
                changed += 1;
            }
        }
        changed
    }
}
