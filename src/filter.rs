use crate::diff::ImportBatch;
use crate::error::{HostApiError, Result};
use crate::scene::{ObjectKind, SceneGraph};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// 180 degrees about X, compensating for the axis convention difference
/// between the two applications.
pub const CORRECTIVE_ROTATION_X: f32 = std::f32::consts::PI;

/// Uniform shrink compensating for the unit difference (cm vs m).
pub const CORRECTIVE_SCALE: f32 = 0.01;

/// Which categories and data blocks of an import batch to keep, plus the
/// two corrective post-process switches. Immutable for the duration of
/// one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub meshes: bool,
    pub lights: bool,
    pub cameras: bool,
    pub curves: bool,
    pub armatures: bool,
    pub animations: bool,
    pub materials: bool,
    pub apply_rotation: bool,
    pub apply_scale: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            meshes: true,
            lights: true,
            cameras: true,
            curves: true,
            armatures: true,
            animations: true,
            materials: true,
            apply_rotation: false,
            apply_scale: true,
        }
    }
}

impl RetentionConfig {
    /// Keep everything, touch nothing.
    pub fn keep_all() -> Self {
        Self {
            apply_scale: false,
            ..Self::default()
        }
    }

    fn retains(&self, kind: ObjectKind) -> bool {
        match kind {
            ObjectKind::Mesh => self.meshes,
            ObjectKind::Light => self.lights,
            ObjectKind::Camera => self.cameras,
            ObjectKind::Curve => self.curves,
            ObjectKind::Armature => self.armatures,
            // Empties and unclassified objects are never filtered out.
            ObjectKind::Empty | ObjectKind::Other => true,
        }
    }
}

/// Result of one filter pass. `removed` names are gone from the scene and
/// must not be referenced again; `survivors` are left selected in the
/// host for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub removed: Vec<String>,
    pub survivors: Vec<String>,
}

/// The categories subject to deletion, in the order they are processed.
const FILTERED_KINDS: [ObjectKind; 5] = [
    ObjectKind::Mesh,
    ObjectKind::Light,
    ObjectKind::Camera,
    ObjectKind::Curve,
    ObjectKind::Armature,
];

/// Applies a retention configuration to a freshly imported batch.
///
/// Order: corrective transform first, over the whole batch, so objects a
/// later step deletes need no special handling and re-running the filter
/// never compounds the correction (both corrections set absolute values).
/// Then per-category bulk deletion through the host's selection, then
/// animation and material stripping on the survivors.
///
/// Objects that vanish between steps are tolerated per object; any other
/// host rejection aborts the batch.
pub fn filter(
    scene: &mut dyn SceneGraph,
    batch: &ImportBatch,
    config: &RetentionConfig,
) -> Result<FilterOutcome> {
    apply_corrective_transform(scene, batch, config)?;

    let mut removed: Vec<String> = Vec::new();
    for kind in FILTERED_KINDS {
        if config.retains(kind) {
            continue;
        }
        removed.extend(delete_kind(scene, batch, kind)?);
    }
    if config.armatures && !config.meshes && config.animations {
        info!("meshes are filtered out but animations are kept; keeping armatures they may depend on");
    }

    let mut survivors: Vec<String> = batch
        .iter()
        .filter(|n| scene.exists(n))
        .map(str::to_string)
        .collect();
    survivors.sort();

    if !config.animations {
        strip_animation(scene, &survivors)?;
    }
    if !config.materials {
        strip_materials(scene, &survivors)?;
    }

    scene.deselect_all();
    for name in &survivors {
        tolerate_missing(scene.select(name))?;
    }

    removed.sort();
    removed.dedup();
    Ok(FilterOutcome { removed, survivors })
}

fn apply_corrective_transform(
    scene: &mut dyn SceneGraph,
    batch: &ImportBatch,
    config: &RetentionConfig,
) -> Result<()> {
    if !config.apply_rotation && !config.apply_scale {
        return Ok(());
    }
    for name in batch.iter() {
        if !scene.exists(name) {
            continue;
        }
        let mut transform = match scene.transform(name) {
            Ok(t) => t,
            Err(e) if e.is_missing_object() => continue,
            Err(e) => return Err(e.into()),
        };
        if config.apply_rotation {
            transform.rotation_euler[0] = CORRECTIVE_ROTATION_X;
        }
        if config.apply_scale {
            transform.scale = [CORRECTIVE_SCALE; 3];
        }
        tolerate_missing(scene.set_transform(name, transform))?;
    }
    if config.apply_rotation {
        info!("applied 180 degree X-axis rotation to {} imported objects", batch.len());
    }
    if config.apply_scale {
        info!("applied {} uniform scale to {} imported objects", CORRECTIVE_SCALE, batch.len());
    }
    Ok(())
}

/// Selects every still-present batch member of `kind` and deletes the
/// selection in one host command. Deleting through the host's native
/// command keeps its undo stack and dependency graph consistent, which
/// object-by-object removal could violate.
fn delete_kind(
    scene: &mut dyn SceneGraph,
    batch: &ImportBatch,
    kind: ObjectKind,
) -> Result<Vec<String>> {
    scene.deselect_all();
    let mut matched = 0usize;
    for name in batch.iter() {
        if !scene.exists(name) {
            continue;
        }
        let object_kind = match scene.kind(name) {
            Ok(k) => k,
            Err(e) if e.is_missing_object() => continue,
            Err(e) => return Err(e.into()),
        };
        if object_kind == kind {
            tolerate_missing(scene.select(name))?;
            matched += 1;
        }
    }
    if matched == 0 {
        scene.deselect_all();
        return Ok(Vec::new());
    }
    info!("filtering out {matched} {kind:?} objects");
    let deleted = scene.delete_selected()?;
    scene.deselect_all();
    Ok(deleted)
}

fn strip_animation(scene: &mut dyn SceneGraph, survivors: &[String]) -> Result<()> {
    let mut cleared = 0usize;
    for name in survivors {
        match scene.has_animation(name) {
            Ok(true) => {
                tolerate_missing(scene.clear_animation(name))?;
                cleared += 1;
            }
            Ok(false) => {}
            Err(e) if e.is_missing_object() => {}
            Err(e) => return Err(e.into()),
        }
    }
    if cleared > 0 {
        debug!("cleared animation data from {cleared} objects");
    }
    Ok(())
}

fn strip_materials(scene: &mut dyn SceneGraph, survivors: &[String]) -> Result<()> {
    let mut cleared = 0usize;
    for name in survivors {
        match scene.material_slot_count(name) {
            Ok(n) if n > 0 => {
                tolerate_missing(scene.clear_materials(name))?;
                cleared += 1;
            }
            Ok(_) => {}
            Err(e) if e.is_missing_object() => {}
            Err(e) => return Err(e.into()),
        }
    }
    if cleared > 0 {
        debug!("cleared material slots on {cleared} objects");
    }
    Ok(())
}

/// An object going missing mid-pipeline means an earlier step already
/// removed it, which is the desired end state; anything else propagates.
fn tolerate_missing(result: std::result::Result<(), HostApiError>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_missing_object() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;
    use crate::scene::mock::{MockObject, MockScene};

    fn scene_with_batch() -> (MockScene, ImportBatch) {
        let mut scene = MockScene::new();
        scene.add("meshA", MockObject::new(ObjectKind::Mesh).animated().with_materials(&["red"]));
        scene.add("lightB", MockObject::new(ObjectKind::Light));
        scene.add("cameraC", MockObject::new(ObjectKind::Camera));
        scene.add("curveD", MockObject::new(ObjectKind::Curve));
        scene.add("rigE", MockObject::new(ObjectKind::Armature).animated());
        let batch = ImportBatch::from_names(["meshA", "lightB", "cameraC", "curveD", "rigE"]);
        (scene, batch)
    }

    #[test]
    fn keep_all_is_a_no_op() {
        let (mut scene, batch) = scene_with_batch();
        let outcome = filter(&mut scene, &batch, &RetentionConfig::keep_all()).unwrap();

        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.survivors, batch.names());
        let mesh = scene.object("meshA").unwrap();
        assert_eq!(mesh.transform, Transform::default());
        assert!(mesh.animated);
        assert_eq!(mesh.material_slots, ["red"]);
    }

    #[test]
    fn category_off_removes_exactly_that_category() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            lights: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();

        assert_eq!(outcome.removed, ["lightB"]);
        assert!(!scene.exists("lightB"));
        for name in ["meshA", "cameraC", "curveD", "rigE"] {
            assert!(scene.exists(name), "{name} should survive");
        }
    }

    #[test]
    fn animations_off_clears_survivor_animation_only() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            animations: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();

        assert!(outcome.removed.is_empty());
        for name in outcome.survivors {
            assert!(!scene.object(&name).unwrap().animated);
        }
        // objects themselves untouched
        assert!(scene.exists("meshA"));
        assert_eq!(scene.object("meshA").unwrap().material_slots, ["red"]);
    }

    #[test]
    fn materials_off_clears_all_slots() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            materials: false,
            ..RetentionConfig::keep_all()
        };
        filter(&mut scene, &batch, &config).unwrap();
        assert!(scene.object("meshA").unwrap().material_slots.is_empty());
        assert!(scene.object("meshA").unwrap().animated);
    }

    #[test]
    fn armature_kept_when_meshes_off_but_animations_on() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            meshes: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();

        assert_eq!(outcome.removed, ["meshA"]);
        assert!(scene.exists("rigE"));
        assert!(scene.object("rigE").unwrap().animated);
    }

    #[test]
    fn corrective_transform_applied_to_survivors_only_once() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            lights: false,
            apply_rotation: true,
            apply_scale: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();

        for name in &outcome.survivors {
            let t = scene.object(name).unwrap().transform;
            assert_eq!(t.rotation_euler[0], CORRECTIVE_ROTATION_X);
            assert_eq!(t.scale, [1.0; 3]);
        }

        // Re-running over the survivor set must not compound the rotation.
        let second_batch = ImportBatch::from_names(outcome.survivors.clone());
        let again = filter(&mut scene, &second_batch, &config).unwrap();
        assert!(again.removed.is_empty());
        assert_eq!(again.survivors, outcome.survivors);
        for name in &again.survivors {
            let t = scene.object(name).unwrap().transform;
            assert_eq!(t.rotation_euler[0], CORRECTIVE_ROTATION_X);
        }
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            lights: false,
            cameras: false,
            animations: false,
            ..RetentionConfig::keep_all()
        };
        let first = filter(&mut scene, &batch, &config).unwrap();
        let survivors = ImportBatch::from_names(first.survivors.clone());
        let second = filter(&mut scene, &survivors, &config).unwrap();

        assert!(second.removed.is_empty());
        assert_eq!(second.survivors, first.survivors);
    }

    #[test]
    fn spec_scenario_mesh_light_camera() {
        let mut scene = MockScene::new();
        scene.add("meshA", MockObject::new(ObjectKind::Mesh));
        scene.add("lightB", MockObject::new(ObjectKind::Light));
        scene.add("cameraC", MockObject::new(ObjectKind::Camera));
        let batch = ImportBatch::from_names(["meshA", "lightB", "cameraC"]);
        let config = RetentionConfig {
            lights: false,
            apply_rotation: true,
            apply_scale: false,
            ..RetentionConfig::keep_all()
        };

        let outcome = filter(&mut scene, &batch, &config).unwrap();

        assert_eq!(outcome.removed, ["lightB"]);
        assert_eq!(outcome.survivors, ["cameraC", "meshA"]);
        for name in ["meshA", "cameraC"] {
            let t = scene.object(name).unwrap().transform;
            assert_eq!(t.rotation_euler[0], CORRECTIVE_ROTATION_X);
            assert_eq!(t.scale, [1.0; 3]);
        }
    }

    #[test]
    fn survivors_end_up_selected() {
        let (mut scene, batch) = scene_with_batch();
        let config = RetentionConfig {
            curves: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();
        assert_eq!(scene.selected_names(), outcome.survivors);
    }

    #[test]
    fn empty_and_other_kinds_are_never_deleted() {
        let mut scene = MockScene::new();
        scene.add("anchor", MockObject::new(ObjectKind::Empty));
        scene.add("oddity", MockObject::new(ObjectKind::Other));
        let batch = ImportBatch::from_names(["anchor", "oddity"]);
        let config = RetentionConfig {
            meshes: false,
            lights: false,
            cameras: false,
            curves: false,
            armatures: false,
            ..RetentionConfig::keep_all()
        };
        let outcome = filter(&mut scene, &batch, &config).unwrap();
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.survivors, ["anchor", "oddity"]);
    }
}
