//! 平铺文件存储:生成结果以 path -> content 形式保存,顺序即插入顺序。

use rustc_hash::FxHashMap;

/// 一份生成出来的文件。path 是仓库相对路径,用 `/` 分隔。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

/// 扁平的文件集合。重复写入同一路径会原位替换内容,保持原有顺序。
#[derive(Debug, Default)]
pub struct FileStore {
    entries: Vec<FileEntry>,
    index: FxHashMap<String, usize>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个文件。已存在的路径只更新内容,不改变次序。
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        let content = content.into();
        match self.index.get(&path) {
            Some(&slot) => {
                if let Some(entry) = self.entries.get_mut(slot) {
                    entry.content = content;
                }
            }
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push(FileEntry { path, content });
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        let slot = *self.index.get(path)?;
        self.entries.get(slot).map(|entry| entry.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl FromIterator<(String, String)> for FileStore {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (path, content) in iter {
            store.insert(path, content);
        }
        store
    }
}
