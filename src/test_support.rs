use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const TASK_YAML: &str = r#"
id: t1a2b3
service_id: svc9
node_id: node-abc
slot: 3
service_annotations:
  name: web
  labels:
    tier: backend
"#;

pub(crate) const NODE_YAML: &str = r#"
hostname: node-7
platform:
  architecture: x86_64
  os: linux
"#;

/// Fact files for a replicated `web` task in slot 3 on `node-7`.
pub(crate) struct FactFiles {
    pub dir: TempDir,
    pub task: PathBuf,
    pub node: PathBuf,
}

impl FactFiles {
    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub(crate) fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub(crate) fn create_fact_files() -> FactFiles {
    let dir = TempDir::new().unwrap();
    let task = dir.path().join("task.yaml");
    let node = dir.path().join("node.yaml");
    std::fs::write(&task, TASK_YAML).unwrap();
    std::fs::write(&node, NODE_YAML).unwrap();

    FactFiles { dir, task, node }
}
