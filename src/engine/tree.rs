//! Category tree builder
//!
//! Turns the flat, company-scoped category list into an arena keyed by
//! category id. Nodes refer to their parent and children by id only, so the
//! tree owns every category and there is nothing to borrow across nodes.
//!
//! Malformed input is expected: a parent chain may loop or point outside the
//! company. Such categories (and everything hanging below them) are excluded
//! from the tree and reported through [`Diagnostics`]; they never cause a
//! panic or an endless walk.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::{Category, CategoryId, CompanyId};

use super::diagnostics::{Diagnostic, Diagnostics};

/// A category placed in the tree
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub category: Category,
    /// Parent id, `None` for roots
    pub parent: Option<CategoryId>,
    /// Child ids ordered by name, then id
    pub children: Vec<CategoryId>,
    /// Distance from the root (roots are 0)
    pub depth: usize,
}

impl CategoryNode {
    pub fn id(&self) -> CategoryId {
        self.category.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Forest of one company's categories
#[derive(Debug, Clone)]
pub struct CategoryTree {
    company_id: CompanyId,
    nodes: HashMap<CategoryId, CategoryNode>,
    roots: Vec<CategoryId>,
    /// Every node, parents before their descendants
    pre_order: Vec<CategoryId>,
    /// Categories of this company left out of the forest
    excluded: Vec<CategoryId>,
}

impl CategoryTree {
    /// Build the forest for `company_id` from a flat category list
    pub fn build(
        company_id: CompanyId,
        categories: &[Category],
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut foreign: HashSet<CategoryId> = HashSet::new();
        let mut by_id: HashMap<CategoryId, &Category> = HashMap::with_capacity(categories.len());

        for category in categories {
            if category.company_id != company_id {
                foreign.insert(category.id);
                diagnostics.push(Diagnostic::ForeignRecord {
                    entity_type: "Category",
                    id: category.id.to_string(),
                    company_id: category.company_id,
                });
                continue;
            }
            if by_id.contains_key(&category.id) {
                warn!("Duplicate category id {}; keeping the first record", category.id);
                continue;
            }
            by_id.insert(category.id, category);
        }

        let mut sorted: Vec<&Category> = by_id.values().copied().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let mut roots = Vec::new();
        let mut children_of: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
        let mut dangling: HashSet<CategoryId> = HashSet::new();

        for category in &sorted {
            match category.parent_id {
                None => roots.push(category.id),
                Some(parent_id) if by_id.contains_key(&parent_id) => {
                    children_of.entry(parent_id).or_default().push(category.id);
                }
                Some(parent_id) => {
                    if foreign.contains(&parent_id) {
                        debug!("Parent {} of {} belongs to another company", parent_id, category.id);
                    } else {
                        debug!("Parent {} of {} is unknown", parent_id, category.id);
                    }
                    dangling.insert(category.id);
                    diagnostics.push(Diagnostic::CrossTenantReference {
                        category_id: category.id,
                        parent_id,
                    });
                }
            }
        }

        // Forward pass: iterative DFS from the declared roots. Every category
        // has a single parent, so each one is pushed at most once.
        let mut nodes: HashMap<CategoryId, CategoryNode> = HashMap::with_capacity(by_id.len());
        let mut pre_order = Vec::with_capacity(by_id.len());
        let mut stack: Vec<(CategoryId, usize)> = roots.iter().rev().map(|id| (*id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(category) = by_id.get(&id) else {
                continue;
            };
            let children = children_of.remove(&id).unwrap_or_default();
            for child in children.iter().rev() {
                stack.push((*child, depth + 1));
            }
            pre_order.push(id);
            nodes.insert(
                id,
                CategoryNode {
                    category: (*category).clone(),
                    parent: category.parent_id,
                    children,
                    depth,
                },
            );
        }

        let excluded = classify_unreached(&by_id, &nodes, &dangling, diagnostics);

        debug!(
            "Built category tree for {}: {} nodes, {} roots, {} excluded",
            company_id,
            nodes.len(),
            roots.len(),
            excluded.len()
        );

        Self {
            company_id,
            nodes,
            roots,
            pre_order,
            excluded,
        }
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn get(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Root ids ordered by name, then id
    pub fn roots(&self) -> &[CategoryId] {
        &self.roots
    }

    /// Child ids of a node (empty for unknown ids)
    pub fn children(&self, id: CategoryId) -> &[CategoryId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Node ids with every parent ahead of its descendants (display order)
    pub fn pre_order(&self) -> &[CategoryId] {
        &self.pre_order
    }

    /// Nodes in display order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> + '_ {
        self.pre_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Node ids with every descendant ahead of its parent
    pub fn bottom_up(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.pre_order.iter().rev().copied()
    }

    /// Walk from a node's parent up to its root
    pub fn ancestors(&self, id: CategoryId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(&id).and_then(|n| n.parent),
            remaining: self.nodes.len(),
        }
    }

    /// Categories of this company that are not part of the forest, sorted by id
    pub fn excluded(&self) -> &[CategoryId] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.values().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a CategoryTree,
    next: Option<CategoryId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.tree.nodes.get(&self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

/// Work out why each unreached category is unreachable.
///
/// Walks the parent chain of every unreached category. A walk ends when it
/// revisits a node of its own path (a cycle), reaches a category whose parent
/// is outside the company, or joins a chain that was already classified. Each
/// category is put on a path once, so the whole pass is linear.
fn classify_unreached(
    by_id: &HashMap<CategoryId, &Category>,
    reached: &HashMap<CategoryId, CategoryNode>,
    dangling: &HashSet<CategoryId>,
    diagnostics: &mut Diagnostics,
) -> Vec<CategoryId> {
    let mut unreached: Vec<CategoryId> = by_id
        .keys()
        .copied()
        .filter(|id| !reached.contains_key(id))
        .collect();
    unreached.sort();

    let mut excluded: HashSet<CategoryId> = HashSet::with_capacity(unreached.len());

    for start in &unreached {
        if excluded.contains(start) {
            continue;
        }

        let mut path: Vec<CategoryId> = Vec::new();
        let mut on_path: HashSet<CategoryId> = HashSet::new();
        let mut current = *start;

        loop {
            if excluded.contains(&current) {
                break;
            }
            if !on_path.insert(current) {
                let loop_start = path.iter().position(|id| *id == current).unwrap_or(0);
                let category_id = path[loop_start..].iter().min().copied().unwrap_or(current);
                diagnostics.push(Diagnostic::CycleDetected { category_id });
                break;
            }
            path.push(current);

            if dangling.contains(&current) {
                break;
            }
            match by_id.get(&current).and_then(|c| c.parent_id) {
                Some(parent) if by_id.contains_key(&parent) => current = parent,
                _ => break,
            }
        }

        excluded.extend(path);
    }

    unreached
}
