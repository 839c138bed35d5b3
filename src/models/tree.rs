//! 把平铺的文件路径投影成树,并为树视图提供展开/选中状态与扁平化行。
//!
//! 树本身不存内容,只有结构;内容始终以 [`FileStore`](super::store::FileStore)
//! 为准。展开状态按路径记,重建树之后仍然有效。

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use std::fmt;

use super::store::FileStore;

slotmap::new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    name: CompactString,
    path: String,
    children: Vec<NodeId>,
}

/// 路径不合法时投影直接失败,带出第一条坏路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    Empty,
    EmptySegment { path: String },
    Conflict { path: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "empty file path"),
            PathError::EmptySegment { path } => {
                write!(f, "path contains an empty segment: {path}")
            }
            PathError::Conflict { path } => {
                write!(f, "path collides with an existing entry: {path}")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// 由文件路径推导出来的树。兄弟顺序跟随文件首次出现的顺序。
#[derive(Debug, Default)]
pub struct SiteTree {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    by_path: FxHashMap<String, NodeId>,
}

/// 把整个文件存储投影成一棵树。任何一条路径非法都返回错误,不产出半成品。
pub fn project_tree(store: &FileStore) -> Result<SiteTree, PathError> {
    let mut tree = SiteTree::new();
    for entry in store.iter() {
        tree.insert_path(&entry.path)?;
    }
    Ok(tree)
}

impl SiteTree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            roots: Vec::new(),
            by_path: FxHashMap::default(),
        }
    }

    fn insert_path(&mut self, path: &str) -> Result<(), PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        }

        // 逐段找到或建出文件夹链,最后挂文件节点。
        let mut parent: Option<NodeId> = None;
        let mut end = 0usize;
        for segment in &segments[..segments.len() - 1] {
            end = if end == 0 {
                segment.len()
            } else {
                end + 1 + segment.len()
            };
            let prefix = &path[..end];
            parent = Some(match self.by_path.get(prefix).copied() {
                Some(id) => {
                    if self.kind(id) != Some(NodeKind::Folder) {
                        return Err(PathError::Conflict {
                            path: path.to_string(),
                        });
                    }
                    id
                }
                None => self.attach(parent, NodeKind::Folder, segment, prefix),
            });
        }

        if self.by_path.contains_key(path) {
            return Err(PathError::Conflict {
                path: path.to_string(),
            });
        }
        let name = segments[segments.len() - 1];
        self.attach(parent, NodeKind::File, name, path);
        Ok(())
    }

    fn attach(&mut self, parent: Option<NodeId>, kind: NodeKind, name: &str, path: &str) -> NodeId {
        let id = self.arena.insert(Node {
            kind,
            name: CompactString::from(name),
            path: path.to_string(),
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => {
                if let Some(node) = self.arena.get_mut(parent_id) {
                    node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.by_path.insert(path.to_string(), id);
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.arena.get(id).map(|node| node.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|node| node.name.as_str())
    }

    pub fn path(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|node| node.path.as_str())
    }

    pub fn is_folder(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Folder)
    }

    pub fn node_by_path(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn file_count(&self) -> usize {
        self.arena
            .values()
            .filter(|node| node.kind == NodeKind::File)
            .count()
    }
}

/// 树视图自己的状态:哪些文件夹展开、当前选中哪个文件。
/// 全部按路径记,所以换一棵新树也不会丢。
#[derive(Debug, Default)]
pub struct TreeViewState {
    expanded: FxHashSet<String>,
    selected: Option<String>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: impl Into<String>) {
        self.expanded.insert(path.into());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    pub fn toggle(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn select(&mut self, path: impl Into<String>) {
        self.selected = Some(path.into());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// 扁平化之后的一行,渲染时直接用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: CompactString,
    pub path: String,
    pub is_folder: bool,
    pub is_expanded: bool,
}

/// 深度优先展开可见节点。收起的文件夹只出现自己,不出现子孙。
pub fn flatten_tree(tree: &SiteTree, view: &TreeViewState) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, u16)> = Vec::new();
    for &root in tree.roots().iter().rev() {
        stack.push((root, 0));
    }

    while let Some((id, depth)) = stack.pop() {
        let Some(path) = tree.path(id) else { continue };
        let Some(name) = tree.name(id) else { continue };
        let is_folder = tree.is_folder(id);
        let is_expanded = is_folder && view.is_expanded(path);
        rows.push(TreeRow {
            id,
            depth,
            name: CompactString::from(name),
            path: path.to_string(),
            is_folder,
            is_expanded,
        });
        if is_expanded {
            for &child in tree.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    rows
}
