pub mod mock;

use crate::error::HostApiError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category tag of a scene object, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Mesh,
    Light,
    Camera,
    Curve,
    Armature,
    Empty,
    Other,
}

/// Local transform of a scene object. Rotation is a simple XYZ euler in
/// radians; the pipeline only ever sets absolute components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation_euler: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_euler: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// Narrow capability interface over the host application's live scene
/// graph. An adapter over the real host API implements this; the bridge
/// core never touches the host any other way.
///
/// Objects are addressed by name. Names are unique at any point in time
/// but the host may reuse a deleted object's name later; callers must not
/// hold identifiers across operations.
pub trait SceneGraph {
    fn object_names(&self) -> Vec<String>;

    fn exists(&self, name: &str) -> bool;

    fn kind(&self, name: &str) -> Result<ObjectKind, HostApiError>;

    fn transform(&self, name: &str) -> Result<Transform, HostApiError>;

    fn set_transform(&mut self, name: &str, transform: Transform) -> Result<(), HostApiError>;

    fn has_animation(&self, name: &str) -> Result<bool, HostApiError>;

    /// Detach and delete the object's animation data block. The object
    /// itself is untouched.
    fn clear_animation(&mut self, name: &str) -> Result<(), HostApiError>;

    fn material_slot_count(&self, name: &str) -> Result<usize, HostApiError>;

    fn clear_materials(&mut self, name: &str) -> Result<(), HostApiError>;

    fn selected_names(&self) -> Vec<String>;

    fn deselect_all(&mut self);

    fn select(&mut self, name: &str) -> Result<(), HostApiError>;

    /// Bulk-delete the current selection through the host's native delete
    /// command, keeping its undo stack and dependency graph consistent.
    /// Returns the names that were actually removed.
    fn delete_selected(&mut self) -> Result<Vec<String>, HostApiError>;

    /// Host-side import of an interchange file into the live scene.
    fn import_interchange(
        &mut self,
        path: &Path,
        with_animations: bool,
    ) -> Result<(), HostApiError>;

    /// Host-side export of the current selection (or the whole scene) to
    /// an interchange file.
    fn export_interchange(
        &mut self,
        path: &Path,
        selected_only: bool,
        bake_animations: bool,
    ) -> Result<(), HostApiError>;
}
