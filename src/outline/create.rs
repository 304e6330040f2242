//! Creation of chapters, snips and fragments.

use super::{OutlineNode, OutlineView};
use crate::error::{ApiError, StorageError};
use crate::store::{self, DotConfig, OrderEntry, OrderingStore};
use crate::tree::TreeNode;
use crate::types::{ResourceType, CHAPTERS_DIR, DATA_DIR, FRAGMENT_EXTENSION, SNIPS_DIR};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Leave the tree stale; the caller refreshes.
    pub prevent_refresh: bool,
    /// Title to use instead of the generated one.
    pub default_name: Option<String>,
    /// Do not seed the new chapter or snip with an empty fragment.
    pub skip_fragment: bool,
}

/// Unique name for a new resource: `<prefix>-<millis>-<uuid>`.
pub fn usable_file_name(prefix: &str, fragment: bool) -> String {
    let name = format!(
        "{}-{}-{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4()
    );
    if fragment {
        format!("{}.{}", name, FRAGMENT_EXTENSION)
    } else {
        name
    }
}

fn write_empty_fragment(path: &Path) -> Result<(), StorageError> {
    std::fs::write(path, "").map_err(|e| StorageError::io(path, e))
}

fn create_dir(path: &Path) -> Result<(), StorageError> {
    std::fs::create_dir_all(path).map_err(|e| StorageError::io(path, e))
}

impl OutlineView {
    /// Create a chapter at the end of the chapters container. Returns its directory.
    pub fn new_chapter(&mut self, options: CreateOptions) -> Result<PathBuf, ApiError> {
        let result = self.create_chapter(&options);
        self.finish_create(result, &options)
    }

    /// Create a snip in the container implied by `resource`. Returns its directory.
    pub fn new_snip(
        &mut self,
        resource: Option<&OutlineNode>,
        options: CreateOptions,
    ) -> Result<PathBuf, ApiError> {
        let result = self
            .snip_destination(resource)
            .and_then(|container| self.create_snip(&container, &options));
        self.finish_create(result, &options)
    }

    /// Create a fragment in the chapter or snip implied by `resource`. Returns its path.
    pub fn new_fragment(
        &mut self,
        resource: Option<&OutlineNode>,
        options: CreateOptions,
    ) -> Result<PathBuf, ApiError> {
        let result = self
            .fragment_destination(resource)
            .and_then(|parent| self.create_fragment(&parent, &options));
        self.finish_create(result, &options)
    }

    fn finish_create(
        &mut self,
        result: Result<PathBuf, ApiError>,
        options: &CreateOptions,
    ) -> Result<PathBuf, ApiError> {
        if options.prevent_refresh {
            result
        } else {
            self.refresh_after(result)
        }
    }

    fn create_chapter(&self, options: &CreateOptions) -> Result<PathBuf, ApiError> {
        let store = self.context().store.clone();
        let chapters_dir = self.root().join(DATA_DIR).join(CHAPTERS_DIR);
        let name = usable_file_name("chapter", false);

        let title = store::update(store.as_ref(), &chapters_dir, |cfg| {
            let ordering = cfg.next_ordering();
            let title = options
                .default_name
                .clone()
                .unwrap_or_else(|| format!("New Chapter ({})", ordering));
            cfg.insert(name.clone(), OrderEntry::new(title.clone(), ordering));
            title
        })?;

        let chapter_dir = chapters_dir.join(&name);
        let snips_dir = chapter_dir.join(SNIPS_DIR);
        create_dir(&snips_dir)?;
        store.write(&snips_dir, &DotConfig::new())?;

        let mut config = DotConfig::new();
        if !options.skip_fragment {
            let fragment = usable_file_name("fragment", true);
            write_empty_fragment(&chapter_dir.join(&fragment))?;
            config.insert(fragment, OrderEntry::new("New Fragment", 0));
        }
        store.write(&chapter_dir, &config)?;

        info!("Created chapter '{}' at {}", title, chapter_dir.display());
        Ok(chapter_dir)
    }

    /// Snips container a new snip for `resource` goes into.
    fn snip_destination(&self, resource: Option<&OutlineNode>) -> Result<Arc<OutlineNode>, ApiError> {
        let tree = self.tree()?;
        let Some(resource) = resource else {
            return tree.snips_container();
        };
        match resource.resource_type() {
            ResourceType::Snip | ResourceType::Fragment => resource
                .container_parent(self, ResourceType::Root)?
                .snips_container(),
            ResourceType::Container if resource.is_chapters_container() => Err(
                ApiError::InvalidTarget("snips cannot be created in the chapters container".to_string()),
            ),
            ResourceType::Container => self
                .lookup_by_id(resource.id())
                .ok_or_else(|| ApiError::NodeNotFound(resource.ids().relative_uri())),
            ResourceType::Chapter => resource.snips_container(),
            ResourceType::Root => Err(ApiError::InvalidTarget(
                "pick a chapter or snips container for the new snip".to_string(),
            )),
        }
    }

    fn create_snip(&self, container: &OutlineNode, options: &CreateOptions) -> Result<PathBuf, ApiError> {
        let store = self.context().store.clone();
        let container_dir = container.uri(self.root());
        let name = usable_file_name("snip", false);

        let title = store::update(store.as_ref(), &container_dir, |cfg| {
            let ordering = cfg.next_ordering();
            let title = options
                .default_name
                .clone()
                .unwrap_or_else(|| format!("New Snip ({})", ordering));
            cfg.insert(name.clone(), OrderEntry::new(title.clone(), ordering));
            title
        })?;

        let snip_dir = container_dir.join(&name);
        create_dir(&snip_dir)?;
        let mut config = DotConfig::new();
        if !options.skip_fragment {
            let fragment = usable_file_name("fragment", true);
            write_empty_fragment(&snip_dir.join(&fragment))?;
            config.insert(fragment, OrderEntry::new("New Fragment (0)", 0));
        }
        store.write(&snip_dir, &config)?;

        info!("Created snip '{}' at {}", title, snip_dir.display());
        Ok(snip_dir)
    }

    /// Chapter or snip a new fragment for `resource` goes into.
    ///
    /// Without a resource the last opened fragment decides.
    fn fragment_destination(&self, resource: Option<&OutlineNode>) -> Result<Arc<OutlineNode>, ApiError> {
        let resource = match resource {
            Some(resource) => self
                .lookup_by_id(resource.id())
                .ok_or_else(|| ApiError::NodeNotFound(resource.ids().relative_uri()))?,
            None => {
                let last = self.last_accessed().ok_or_else(|| {
                    ApiError::InvalidTarget("no fragment has been opened yet".to_string())
                })?;
                self.lookup_by_uri(&last).ok_or_else(|| {
                    ApiError::InvalidTarget(format!("{} is no longer in the outline", last.display()))
                })?
            }
        };

        match resource.resource_type() {
            ResourceType::Chapter | ResourceType::Snip => Ok(resource),
            ResourceType::Fragment => self
                .parent_of(&resource)
                .ok_or_else(|| ApiError::NodeNotFound(resource.ids().relative_uri())),
            ResourceType::Container => {
                let fragment = self
                    .container_last_accessed(&resource)
                    .and_then(|uri| self.lookup_by_uri(&uri))
                    .ok_or_else(|| {
                        ApiError::InvalidTarget(format!(
                            "container '{}' has no fragment to place the new one next to",
                            resource.ids().display
                        ))
                    })?;
                self.parent_of(&fragment)
                    .ok_or_else(|| ApiError::NodeNotFound(fragment.ids().relative_uri()))
            }
            ResourceType::Root => Err(ApiError::InvalidTarget(
                "fragments cannot be created at the root".to_string(),
            )),
        }
    }

    fn create_fragment(&self, parent: &OutlineNode, options: &CreateOptions) -> Result<PathBuf, ApiError> {
        let store = self.context().store.clone();
        let dir = parent.uri(self.root());
        let name = usable_file_name("fragment", true);

        let title = store::update(store.as_ref(), &dir, |cfg| {
            let ordering = cfg.next_ordering();
            let title = options
                .default_name
                .clone()
                .unwrap_or_else(|| format!("New Fragment ({})", ordering));
            cfg.insert(name.clone(), OrderEntry::new(title.clone(), ordering));
            title
        })?;

        let path = dir.join(&name);
        write_empty_fragment(&path)?;
        info!("Created fragment '{}' at {}", title, path.display());
        Ok(path)
    }
}
