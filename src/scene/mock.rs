//! In-memory scene graph for tests and dry runs.

use super::{ObjectKind, SceneGraph, Transform};
use crate::error::HostApiError;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct MockObject {
    pub kind: ObjectKind,
    pub transform: Transform,
    pub animated: bool,
    pub material_slots: Vec<String>,
}

impl MockObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            animated: false,
            material_slots: Vec::new(),
        }
    }

    pub fn animated(mut self) -> Self {
        self.animated = true;
        self
    }

    pub fn with_materials(mut self, slots: &[&str]) -> Self {
        self.material_slots = slots.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Mock host scene. Objects staged with [`MockScene::stage_import`] appear
/// the next time `import_interchange` is called, which is how tests model
/// "the interchange file contained these objects".
#[derive(Debug, Default)]
pub struct MockScene {
    objects: BTreeMap<String, MockObject>,
    selection: BTreeSet<String>,
    staged: BTreeMap<String, MockObject>,
    exported: Vec<String>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, object: MockObject) {
        self.objects.insert(name.to_string(), object);
    }

    pub fn stage_import(&mut self, name: &str, object: MockObject) {
        self.staged.insert(name.to_string(), object);
    }

    pub fn object(&self, name: &str) -> Option<&MockObject> {
        self.objects.get(name)
    }

    fn get(&self, name: &str) -> Result<&MockObject, HostApiError> {
        self.objects
            .get(name)
            .ok_or_else(|| HostApiError::MissingObject(name.to_string()))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut MockObject, HostApiError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| HostApiError::MissingObject(name.to_string()))
    }
}

impl SceneGraph for MockScene {
    fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    fn kind(&self, name: &str) -> Result<ObjectKind, HostApiError> {
        Ok(self.get(name)?.kind)
    }

    fn transform(&self, name: &str) -> Result<Transform, HostApiError> {
        Ok(self.get(name)?.transform)
    }

    fn set_transform(&mut self, name: &str, transform: Transform) -> Result<(), HostApiError> {
        self.get_mut(name)?.transform = transform;
        Ok(())
    }

    fn has_animation(&self, name: &str) -> Result<bool, HostApiError> {
        Ok(self.get(name)?.animated)
    }

    fn clear_animation(&mut self, name: &str) -> Result<(), HostApiError> {
        self.get_mut(name)?.animated = false;
        Ok(())
    }

    fn material_slot_count(&self, name: &str) -> Result<usize, HostApiError> {
        Ok(self.get(name)?.material_slots.len())
    }

    fn clear_materials(&mut self, name: &str) -> Result<(), HostApiError> {
        self.get_mut(name)?.material_slots.clear();
        Ok(())
    }

    fn selected_names(&self) -> Vec<String> {
        self.selection.iter().cloned().collect()
    }

    fn deselect_all(&mut self) {
        self.selection.clear();
    }

    fn select(&mut self, name: &str) -> Result<(), HostApiError> {
        if !self.objects.contains_key(name) {
            return Err(HostApiError::MissingObject(name.to_string()));
        }
        self.selection.insert(name.to_string());
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<Vec<String>, HostApiError> {
        let doomed: Vec<String> = self.selection.iter().cloned().collect();
        for name in &doomed {
            self.objects.remove(name);
        }
        self.selection.clear();
        Ok(doomed)
    }

    fn import_interchange(
        &mut self,
        path: &Path,
        with_animations: bool,
    ) -> Result<(), HostApiError> {
        if !path.exists() {
            return Err(HostApiError::rejected(
                "import_interchange",
                format!("no such file: {}", path.display()),
            ));
        }
        let staged = std::mem::take(&mut self.staged);
        for (name, mut object) in staged {
            if !with_animations {
                object.animated = false;
            }
            self.objects.insert(name, object);
        }
        Ok(())
    }

    fn export_interchange(
        &mut self,
        path: &Path,
        selected_only: bool,
        _bake_animations: bool,
    ) -> Result<(), HostApiError> {
        let names: Vec<String> = if selected_only {
            self.selection.iter().cloned().collect()
        } else {
            self.objects.keys().cloned().collect()
        };
        let body = names.join("\n");
        fs::write(path, body)
            .map_err(|e| HostApiError::rejected("export_interchange", e))?;
        self.exported = names;
        Ok(())
    }
}
