//! Category Tree
//!
//! Folds the flat `categories` row set into one nested forest. Native and
//! Magento rows share the table but not an identifier space, so each taxonomy
//! is indexed into its own arena and children are linked by slot index within
//! that arena only.
//!
//! Rows whose parent cannot be reached are left out of the forest and reported
//! through [`CategoryTree::dropped`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::domain::aggregates::category::{Category, CategoryRecord, MagentoCategory, NativeCategory, RowError};
use crate::domain::value_objects::{CategorySource, MagentoCategoryId, NativeCategoryId};
use crate::{CatalogError, Result};

/// A category with its children, as served to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub source: CategorySource,
    pub magento_category_id: Option<i64>,
    pub children: Vec<CategoryNode>,
}

// Taxonomies can nest arbitrarily deep; unlink children iteratively so
// dropping a long chain does not recurse once per level.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl From<NativeCategory> for CategoryNode {
    fn from(c: NativeCategory) -> Self {
        Self {
            id: c.id.value(), name: c.name, parent_id: c.parent_id.map(|p| p.value()),
            source: CategorySource::Native, magento_category_id: None, children: vec![],
        }
    }
}

impl From<MagentoCategory> for CategoryNode {
    fn from(c: MagentoCategory) -> Self {
        Self {
            id: c.id, name: c.name, parent_id: c.parent_id.map(|p| p.value()),
            source: CategorySource::Magento, magento_category_id: Some(c.magento_category_id.value()), children: vec![],
        }
    }
}

impl From<Category> for CategoryNode {
    fn from(category: Category) -> Self {
        match category { Category::Native(c) => c.into(), Category::Magento(c) => c.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// `parent_id` names no row in the same taxonomy.
    DanglingParent,
    /// The parent exists but its own ancestry never reaches a root.
    Unreachable,
}

/// A row that was left out of the forest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DroppedCategory {
    pub id: i64,
    pub source: CategorySource,
    /// Identifier in the row's own taxonomy (`id` or `magento_category_id`).
    pub key: i64,
    pub parent_id: i64,
    pub reason: DropReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTree {
    roots: Vec<CategoryNode>,
    dropped: Vec<DroppedCategory>,
}

impl CategoryTree {
    /// Builds the forest from rows ordered by ascending `id`.
    ///
    /// Root order and each node's children order follow input order. Fails
    /// with [`CatalogError::InvalidRow`] on the first row that does not
    /// validate; nothing is returned for a partially valid row set.
    pub fn assemble(records: impl IntoIterator<Item = CategoryRecord>) -> Result<Self> {
        let mut native: Arena<NativeCategory> = Arena::default();
        let mut magento: Arena<MagentoCategory> = Arena::default();
        let mut order = Vec::new();

        for (position, record) in records.into_iter().enumerate() {
            let invalid = |reason| CatalogError::InvalidRow { position, reason };
            let node = match Category::try_from(record).map_err(invalid)? {
                Category::Native(c) => native.insert(c).map(NodeRef::Native),
                Category::Magento(c) => magento.insert(c).map(NodeRef::Magento),
            };
            order.push(node.map_err(invalid)?);
        }

        let mut roots = Vec::new();
        for &node in &order {
            let is_root = match node {
                NodeRef::Native(slot) => native.link(slot),
                NodeRef::Magento(slot) => magento.link(slot),
            };
            if is_root { roots.push(node); }
        }

        let roots = roots
            .into_iter()
            .filter_map(|node| match node {
                NodeRef::Native(slot) => native.materialize(slot),
                NodeRef::Magento(slot) => magento.materialize(slot),
            })
            .collect();

        // Anything still sitting in an arena was never reached from a root.
        let dropped = order
            .into_iter()
            .filter_map(|node| match node {
                NodeRef::Native(slot) => native.leftover(slot),
                NodeRef::Magento(slot) => magento.leftover(slot),
            })
            .collect();

        Ok(Self { roots, dropped })
    }

    pub fn roots(&self) -> &[CategoryNode] { &self.roots }
    pub fn dropped(&self) -> &[DroppedCategory] { &self.dropped }
    pub fn is_empty(&self) -> bool { self.roots.is_empty() }
    pub fn into_parts(self) -> (Vec<CategoryNode>, Vec<DroppedCategory>) { (self.roots, self.dropped) }

    /// Number of nodes in the forest, roots included.
    pub fn node_count(&self) -> usize {
        let mut pending: Vec<&CategoryNode> = self.roots.iter().collect();
        let mut count = 0;
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(&node.children);
        }
        count
    }
}

#[derive(Clone, Copy, Debug)]
enum NodeRef { Native(usize), Magento(usize) }

/// One taxonomy's view of a category: the key it is indexed under and the
/// key its parent is resolved against.
trait Taxon: Into<CategoryNode> {
    type Key: Copy + Eq + Hash + Into<i64>;
    const SOURCE: CategorySource;
    fn row_id(&self) -> i64;
    fn key(&self) -> Self::Key;
    fn parent(&self) -> Option<Self::Key>;
}

impl Taxon for NativeCategory {
    type Key = NativeCategoryId;
    const SOURCE: CategorySource = CategorySource::Native;
    fn row_id(&self) -> i64 { self.id.value() }
    fn key(&self) -> NativeCategoryId { self.id }
    fn parent(&self) -> Option<NativeCategoryId> { self.parent_id }
}

impl Taxon for MagentoCategory {
    type Key = MagentoCategoryId;
    const SOURCE: CategorySource = CategorySource::Magento;
    fn row_id(&self) -> i64 { self.id }
    fn key(&self) -> MagentoCategoryId { self.magento_category_id }
    fn parent(&self) -> Option<MagentoCategoryId> { self.parent_id }
}

enum Parent { Root, Found(usize), Dangling }

struct Slot<T> {
    category: Option<T>,
    children: Vec<usize>,
    dangling: bool,
}

/// Nodes of one taxonomy, addressed by slot index and looked up by the
/// taxonomy's own identifier. Children indices always point into the same arena.
struct Arena<T: Taxon> {
    slots: Vec<Slot<T>>,
    index: HashMap<T::Key, usize>,
}

impl<T: Taxon> Default for Arena<T> {
    fn default() -> Self { Self { slots: vec![], index: HashMap::new() } }
}

impl<T: Taxon> Arena<T> {
    fn insert(&mut self, category: T) -> std::result::Result<usize, RowError> {
        match self.index.entry(category.key()) {
            Entry::Occupied(entry) => Err(RowError::DuplicateId { taxonomy: T::SOURCE, key: (*entry.key()).into() }),
            Entry::Vacant(entry) => {
                self.slots.push(Slot { category: Some(category), children: vec![], dangling: false });
                Ok(*entry.insert(self.slots.len() - 1))
            }
        }
    }

    fn parent_of(&self, slot: usize) -> Parent {
        match self.slots[slot].category.as_ref().and_then(T::parent) {
            None => Parent::Root,
            Some(key) => self.index.get(&key).map_or(Parent::Dangling, |&parent| Parent::Found(parent)),
        }
    }

    /// Attaches `slot` to its parent's children. Returns true for a root.
    fn link(&mut self, slot: usize) -> bool {
        match self.parent_of(slot) {
            Parent::Root => return true,
            Parent::Found(parent) => self.slots[parent].children.push(slot),
            Parent::Dangling => self.slots[slot].dangling = true,
        }
        false
    }

    /// Moves the subtree rooted at `slot` out of the arena.
    ///
    /// Walks depth first with an explicit stack of (node, remaining children)
    /// frames; a node is attached to its parent once all of its children are.
    fn materialize(&mut self, slot: usize) -> Option<CategoryNode> {
        let mut stack = vec![self.take(slot)?];
        loop {
            let next = stack.last_mut()?.1.next();
            match next {
                Some(child) => stack.extend(self.take(child)),
                None => {
                    let (node, _) = stack.pop()?;
                    match stack.last_mut() {
                        Some((parent, _)) => parent.children.push(node),
                        None => return Some(node),
                    }
                }
            }
        }
    }

    fn take(&mut self, slot: usize) -> Option<(CategoryNode, std::vec::IntoIter<usize>)> {
        let category = self.slots[slot].category.take()?;
        let children = std::mem::take(&mut self.slots[slot].children);
        Some((category.into(), children.into_iter()))
    }

    fn leftover(&self, slot: usize) -> Option<DroppedCategory> {
        let slot = &self.slots[slot];
        let category = slot.category.as_ref()?;
        Some(DroppedCategory {
            id: category.row_id(),
            source: T::SOURCE,
            key: category.key().into(),
            parent_id: category.parent()?.into(),
            reason: if slot.dangling { DropReason::DanglingParent } else { DropReason::Unreachable },
        })
    }
}
