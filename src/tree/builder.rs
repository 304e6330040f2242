//! Builds the structural tree from the file system and the ordering stores.

use crate::error::{ApiError, TreeError};
use crate::store::{DotConfig, OrderEntry, OrderingStore};
use crate::tree::node::{NodeData, NodeModel};
use crate::tree::path::is_fragment_name;
use crate::tree::walker::{list_entries, DirEntryInfo};
use crate::types::{
    fresh_internal_id, Ids, InternalId, ResourceType, CHAPTERS_DIR, CHAPTER_SNIPS_ORDERING,
    DATA_DIR, SNIPS_DIR, UNORDERED,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One-shot builder over a project root.
///
/// `init` wraps each finished `NodeModel` into the view's node type, children first.
pub struct TreeBuilder<'a, S: OrderingStore + ?Sized> {
    root: PathBuf,
    store: &'a S,
}

/// Fixed parent link passed down the recursion.
struct Parent<'p> {
    resource_type: ResourceType,
    internal: &'p InternalId,
}

impl<'a, S: OrderingStore + ?Sized> TreeBuilder<'a, S> {
    pub fn new(root: impl Into<PathBuf>, store: &'a S) -> Self {
        Self {
            root: root.into(),
            store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the whole tree. Fails when `data/chapters` or `data/snips` is missing.
    pub fn build<N, F>(&self, init: F) -> Result<Arc<N>, ApiError>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let data_dir = self.root.join(DATA_DIR);
        let chapters_dir = data_dir.join(CHAPTERS_DIR);
        let snips_dir = data_dir.join(SNIPS_DIR);
        for required in [&chapters_dir, &snips_dir] {
            if !required.is_dir() {
                return Err(TreeError::MissingDirectory(required.clone()).into());
            }
        }

        let root_id = fresh_internal_id();
        let root_parent = Parent {
            resource_type: ResourceType::Root,
            internal: &root_id,
        };

        let chapters = self.build_chapters_container(&chapters_dir, &root_parent, &init)?;
        let snips = self.build_snips_container(
            &snips_dir,
            DATA_DIR,
            "Work Snips",
            1,
            &root_parent,
            &init,
        )?;

        let ids = Ids {
            resource_type: ResourceType::Root,
            display: "root".to_string(),
            internal: root_id,
            relative_path: DATA_DIR.to_string(),
            file_name: String::new(),
            parent_type_id: ResourceType::Root,
            parent_internal_id: String::new(),
            ordering: 0,
        };
        debug!("Built outline tree for {}", self.root.display());
        Ok(Arc::new(init(NodeModel {
            ids,
            data: NodeData::Root {
                chapters: Arc::new(chapters),
                snips: Arc::new(snips),
            },
        })))
    }

    fn build_chapters_container<N, F>(
        &self,
        dir: &Path,
        parent: &Parent<'_>,
        init: &F,
    ) -> Result<N, ApiError>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let container_id = fresh_internal_id();
        let me = Parent {
            resource_type: ResourceType::Container,
            internal: &container_id,
        };
        let config = self.store.read(dir)?;
        let chapters_rel = format!("{}/{}", DATA_DIR, CHAPTERS_DIR);

        let mut contents = Vec::new();
        for entry in list_entries(dir)?.into_iter().filter(DirEntryInfo::is_dir) {
            let chapter = self.build_chapter(dir, &chapters_rel, &entry.name, &config, &me, init)?;
            contents.push(Arc::new(chapter));
        }

        Ok(init(NodeModel {
            ids: Ids {
                resource_type: ResourceType::Container,
                display: "Chapters".to_string(),
                internal: container_id,
                relative_path: DATA_DIR.to_string(),
                file_name: CHAPTERS_DIR.to_string(),
                parent_type_id: parent.resource_type,
                parent_internal_id: parent.internal.clone(),
                ordering: 0,
            },
            data: NodeData::Container { contents },
        }))
    }

    fn build_chapter<N, F>(
        &self,
        chapters_dir: &Path,
        chapters_rel: &str,
        name: &str,
        chapters_config: &DotConfig,
        parent: &Parent<'_>,
        init: &F,
    ) -> Result<N, ApiError>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let dir = chapters_dir.join(name);
        let rel = format!("{}/{}", chapters_rel, name);
        let chapter_id = fresh_internal_id();
        let me = Parent {
            resource_type: ResourceType::Chapter,
            internal: &chapter_id,
        };

        let entries = list_entries(&dir)?;
        let mut config = self.store.read(&dir)?;
        let text_data = self.build_fragments(&entries, &rel, &mut config, &me, init);

        let snips_dir = dir.join(SNIPS_DIR);
        let snips = if entries.iter().any(|e| e.is_dir() && e.name == SNIPS_DIR) {
            self.build_snips_container(&snips_dir, &rel, "Snips", CHAPTER_SNIPS_ORDERING, &me, init)?
        } else {
            debug!("Chapter {} has no snips folder", dir.display());
            init(NodeModel {
                ids: Ids {
                    resource_type: ResourceType::Container,
                    display: "Snips".to_string(),
                    internal: fresh_internal_id(),
                    relative_path: rel.clone(),
                    file_name: SNIPS_DIR.to_string(),
                    parent_type_id: ResourceType::Chapter,
                    parent_internal_id: chapter_id.clone(),
                    ordering: CHAPTER_SNIPS_ORDERING,
                },
                data: NodeData::Container {
                    contents: Vec::new(),
                },
            })
        };

        let (display, ordering) = unordered_entry(chapters_config.get(name), name);
        Ok(init(NodeModel {
            ids: Ids {
                resource_type: ResourceType::Chapter,
                display,
                internal: chapter_id,
                relative_path: chapters_rel.to_string(),
                file_name: name.to_string(),
                parent_type_id: parent.resource_type,
                parent_internal_id: parent.internal.clone(),
                ordering,
            },
            data: NodeData::Chapter {
                text_data,
                snips: Arc::new(snips),
            },
        }))
    }

    /// Snips container; `parent_rel` is the relative path of the directory holding it.
    fn build_snips_container<N, F>(
        &self,
        dir: &Path,
        parent_rel: &str,
        display: &str,
        ordering: i64,
        parent: &Parent<'_>,
        init: &F,
    ) -> Result<N, ApiError>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let container_id = fresh_internal_id();
        let me = Parent {
            resource_type: ResourceType::Container,
            internal: &container_id,
        };
        let config = self.store.read(dir)?;
        let rel = format!("{}/{}", parent_rel, SNIPS_DIR);

        let mut contents = Vec::new();
        for entry in list_entries(dir)?.into_iter().filter(DirEntryInfo::is_dir) {
            let snip = self.build_snip(dir, &rel, &entry.name, &config, &me, init)?;
            contents.push(Arc::new(snip));
        }

        Ok(init(NodeModel {
            ids: Ids {
                resource_type: ResourceType::Container,
                display: display.to_string(),
                internal: container_id,
                relative_path: parent_rel.to_string(),
                file_name: SNIPS_DIR.to_string(),
                parent_type_id: parent.resource_type,
                parent_internal_id: parent.internal.clone(),
                ordering,
            },
            data: NodeData::Container { contents },
        }))
    }

    fn build_snip<N, F>(
        &self,
        snips_dir: &Path,
        snips_rel: &str,
        name: &str,
        snips_config: &DotConfig,
        parent: &Parent<'_>,
        init: &F,
    ) -> Result<N, ApiError>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let dir = snips_dir.join(name);
        let rel = format!("{}/{}", snips_rel, name);
        let snip_id = fresh_internal_id();
        let me = Parent {
            resource_type: ResourceType::Snip,
            internal: &snip_id,
        };

        let entries = list_entries(&dir)?;
        let mut config = self.store.read(&dir)?;
        let text_data = self.build_fragments(&entries, &rel, &mut config, &me, init);

        let (display, ordering) = unordered_entry(snips_config.get(name), name);
        Ok(init(NodeModel {
            ids: Ids {
                resource_type: ResourceType::Snip,
                display,
                internal: snip_id,
                relative_path: snips_rel.to_string(),
                file_name: name.to_string(),
                parent_type_id: parent.resource_type,
                parent_internal_id: parent.internal.clone(),
                ordering,
            },
            data: NodeData::Snip { text_data },
        }))
    }

    /// Fragments of one chapter or snip directory.
    ///
    /// Fragments without a record get the next free ordering in memory only;
    /// nothing is written back.
    fn build_fragments<N, F>(
        &self,
        entries: &[DirEntryInfo],
        rel: &str,
        config: &mut DotConfig,
        parent: &Parent<'_>,
        init: &F,
    ) -> Vec<Arc<N>>
    where
        F: Fn(NodeModel<N>) -> N,
    {
        let mut fragments = Vec::new();
        for entry in entries
            .iter()
            .filter(|e| e.is_file() && is_fragment_name(&e.name))
        {
            let info = match config.get(&entry.name) {
                Some(info) => info.clone(),
                None => {
                    warn!(
                        "Fragment {}/{} has no ordering record; appending it",
                        rel, entry.name
                    );
                    let info = OrderEntry::new(entry.name.clone(), config.next_ordering());
                    config.insert(entry.name.clone(), info.clone());
                    info
                }
            };
            fragments.push(Arc::new(init(NodeModel {
                ids: Ids {
                    resource_type: ResourceType::Fragment,
                    display: info.title,
                    internal: fresh_internal_id(),
                    relative_path: rel.to_string(),
                    file_name: entry.name.clone(),
                    parent_type_id: parent.resource_type,
                    parent_internal_id: parent.internal.clone(),
                    ordering: info.ordering,
                },
                data: NodeData::Fragment,
            })));
        }
        fragments
    }
}

/// Display name and ordering for a chapter or snip record, if any.
fn unordered_entry(entry: Option<&OrderEntry>, name: &str) -> (String, i64) {
    match entry {
        Some(entry) => (entry.title.clone(), entry.ordering),
        None => (name.to_string(), UNORDERED),
    }
}
