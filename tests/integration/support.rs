use folio::outline::{CreateOptions, OutlineNode, OutlineView};
use folio::store::{DotConfig, FsOrderingStore, OrderingStore};
use folio::tree::TreeNode;
use folio::workspace::{Session, Workspace, WorkspaceInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A freshly created project with an in-memory session over it.
pub struct TestProject {
    _temp: TempDir,
    pub session: Session,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("novel");
        let workspace = Workspace::create(&root, WorkspaceInfo::new("tester", "Novel")).unwrap();
        let session = Session::in_memory(workspace).unwrap();
        Self {
            _temp: temp,
            session,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.session.workspace().root().to_path_buf()
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.session.workspace().chapters_dir()
    }

    pub fn snips_dir(&self) -> PathBuf {
        self.session.workspace().snips_dir()
    }

    pub fn outline(&self) -> &OutlineView {
        self.session.outline()
    }

    pub fn outline_mut(&mut self) -> &mut OutlineView {
        self.session.outline_mut()
    }

    /// Outline node at `uri` in the current tree.
    pub fn node(&self, uri: &Path) -> Arc<OutlineNode> {
        self.outline()
            .lookup_by_uri(uri)
            .unwrap_or_else(|| panic!("{} is not in the outline", uri.display()))
    }

    pub fn chapter(&mut self, title: &str) -> PathBuf {
        self.outline_mut().new_chapter(named(title)).unwrap()
    }

    pub fn empty_chapter(&mut self, title: &str) -> PathBuf {
        self.outline_mut()
            .new_chapter(CreateOptions {
                skip_fragment: true,
                ..named(title)
            })
            .unwrap()
    }

    /// Snip without a seed fragment, placed as `new_snip` decides for `at`.
    pub fn empty_snip(&mut self, at: Option<&Path>, title: &str) -> PathBuf {
        let at = at.map(|uri| self.node(uri));
        self.outline_mut()
            .new_snip(
                at.as_deref(),
                CreateOptions {
                    skip_fragment: true,
                    ..named(title)
                },
            )
            .unwrap()
    }

    pub fn snip(&mut self, at: Option<&Path>, title: &str) -> PathBuf {
        let at = at.map(|uri| self.node(uri));
        self.outline_mut().new_snip(at.as_deref(), named(title)).unwrap()
    }

    pub fn fragment(&mut self, at: &Path, title: &str) -> PathBuf {
        let at = self.node(at);
        self.outline_mut().new_fragment(Some(at.as_ref()), named(title)).unwrap()
    }

    /// Display titles of the children of the node at `uri`, in display order.
    pub fn titles(&self, uri: &Path) -> Vec<String> {
        self.node(uri)
            .structural_children()
            .iter()
            .map(|child| child.ids().display.clone())
            .collect()
    }

    /// First fragment of the chapter or snip at `uri`.
    pub fn first_fragment(&self, uri: &Path) -> PathBuf {
        let root = self.root();
        self.node(uri)
            .structural_children()
            .into_iter()
            .find(|child| child.resource_type() == folio::types::ResourceType::Fragment)
            .map(|fragment| fragment.uri(&root))
            .unwrap_or_else(|| panic!("{} has no fragment", uri.display()))
    }
}

pub fn named(title: &str) -> CreateOptions {
    CreateOptions {
        default_name: Some(title.to_string()),
        ..CreateOptions::default()
    }
}

pub fn read_store(dir: &Path) -> DotConfig {
    FsOrderingStore::new().read(dir).unwrap()
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

/// Ordering recorded for `path` in its parent's store.
pub fn ordering_of(path: &Path) -> i64 {
    read_store(path.parent().unwrap())
        .get(&file_name(path))
        .unwrap_or_else(|| panic!("no record for {}", path.display()))
        .ordering
}
