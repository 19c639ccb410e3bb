use crate::scene::SceneGraph;
use std::collections::HashSet;

/// Names of everything present in the scene at one instant.
///
/// Identity is the object name. The host can reuse a deleted object's
/// name, so a snapshot is only meaningful for the duration of a single
/// import operation; this is a known correctness risk, not worked around.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    names: HashSet<String>,
}

impl SceneSnapshot {
    /// O(n) scan of current object names.
    pub fn capture(scene: &dyn SceneGraph) -> Self {
        Self {
            names: scene.object_names().into_iter().collect(),
        }
    }

    /// Everything present now that was not present at capture time.
    /// Objects renamed or deleted since the snapshot simply no longer
    /// match and are excluded. An empty batch is valid and means
    /// "nothing imported"; callers warn rather than fail.
    pub fn diff(&self, scene: &dyn SceneGraph) -> ImportBatch {
        let mut names: Vec<String> = scene
            .object_names()
            .into_iter()
            .filter(|n| !self.names.contains(n))
            .collect();
        names.sort();
        ImportBatch { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The set of objects one interchange import introduced. Ephemeral; owned
/// by the filter pipeline for the duration of one import.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    names: Vec<String>,
}

impl ImportBatch {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mock::{MockObject, MockScene};
    use crate::scene::ObjectKind;

    #[test]
    fn diff_reports_only_new_objects() {
        let mut scene = MockScene::new();
        scene.add("old_cube", MockObject::new(ObjectKind::Mesh));

        let snapshot = SceneSnapshot::capture(&scene);
        scene.add("new_cube", MockObject::new(ObjectKind::Mesh));
        scene.add("new_lamp", MockObject::new(ObjectKind::Light));

        let batch = snapshot.diff(&scene);
        assert_eq!(batch.names(), ["new_cube", "new_lamp"]);
        assert!(!batch.contains("old_cube"));
    }

    #[test]
    fn diff_excludes_objects_deleted_after_snapshot() {
        let mut scene = MockScene::new();
        scene.add("keeper", MockObject::new(ObjectKind::Mesh));

        let snapshot = SceneSnapshot::capture(&scene);
        scene.add("transient", MockObject::new(ObjectKind::Mesh));
        scene.deselect_all();
        scene.select("transient").unwrap();
        scene.delete_selected().unwrap();

        let batch = snapshot.diff(&scene);
        assert!(batch.is_empty());
    }

    #[test]
    fn empty_diff_is_valid() {
        let scene = MockScene::new();
        let snapshot = SceneSnapshot::capture(&scene);
        let batch = snapshot.diff(&scene);
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
