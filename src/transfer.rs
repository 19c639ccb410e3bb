//! Orchestration of whole import and export operations.
//!
//! Every operation is all-or-nothing: any invoker or interchange failure
//! aborts it with a single message pointing at the log. Scratch files
//! live in a per-operation temp directory that is removed on every exit
//! path. Per-object filter failures never abort a batch; they are handled
//! inside [`crate::filter`].

use crate::context::BridgeContext;
use crate::convert::{invoker, script};
use crate::diff::SceneSnapshot;
use crate::discovery::Install;
use crate::error::{BridgeError, Result};
use crate::filter::{self, RetentionConfig};
use crate::scene::{ObjectKind, SceneGraph};
use crate::{INTERCHANGE_EXT, NATIVE_EXT};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Export-side category switches plus the selection-only toggle. The
/// export direction has no material/armature switches of its own; the
/// interchange writer handles those.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub meshes: bool,
    pub lights: bool,
    pub cameras: bool,
    pub curves: bool,
    pub animations: bool,
    pub selected_only: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            meshes: true,
            lights: true,
            cameras: true,
            curves: true,
            animations: true,
            selected_only: false,
        }
    }
}

impl ExportOptions {
    fn wants(&self, kind: ObjectKind) -> bool {
        match kind {
            ObjectKind::Mesh => self.meshes,
            ObjectKind::Light => self.lights,
            ObjectKind::Camera => self.cameras,
            ObjectKind::Curve => self.curves,
            // a skeleton travels with either the meshes or the animation
            ObjectKind::Armature => self.meshes || self.animations,
            ObjectKind::Empty | ObjectKind::Other => false,
        }
    }
}

/// What one import did, for the caller's status line.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub removed: usize,
    pub survivors: Vec<String>,
}

/// Converts a native scene file to an interchange file through the
/// external console. This is the out-of-process half of an import, also
/// exposed directly by the CLI shell.
pub fn convert_native_to_interchange(
    ctx: &BridgeContext,
    install: &Install,
    native: &Path,
    interchange: &Path,
) -> Result<()> {
    require_extension(native, NATIVE_EXT)?;
    require_artifact(native)?;
    let body = script::import_script(native, interchange);
    run_console(ctx, install, &body)?;
    require_output(ctx, interchange)
}

/// Converts an interchange file to a native scene file through the
/// external console. The out-of-process half of an export.
pub fn convert_interchange_to_native(
    ctx: &BridgeContext,
    install: &Install,
    interchange: &Path,
    native: &Path,
) -> Result<()> {
    require_artifact(interchange)?;
    let body = script::export_script(interchange, native);
    run_console(ctx, install, &body)?;
    require_output(ctx, native)
}

/// Full import: native file → interchange → host scene, then diff and
/// filter the newly introduced objects.
pub fn import_scene(
    ctx: &BridgeContext,
    scene: &mut dyn SceneGraph,
    install: &Install,
    source: &Path,
    config: &RetentionConfig,
) -> Result<ImportReport> {
    info!("importing native scene file: {}", source.display());
    let scratch = ctx.scratch_dir("import_")?;
    let interchange = scratch.path().join(interchange_name(source));

    convert_native_to_interchange(ctx, install, source, &interchange)?;

    let snapshot = SceneSnapshot::capture(scene);
    scene.import_interchange(&interchange, config.animations)?;
    let batch = snapshot.diff(scene);

    if batch.is_empty() {
        warn!("interchange import added no objects to the scene");
        return Ok(ImportReport::default());
    }
    info!("identified {} newly imported objects", batch.len());

    let outcome = filter::filter(scene, &batch, config)?;
    Ok(ImportReport {
        imported: batch.len(),
        removed: outcome.removed.len(),
        survivors: outcome.survivors,
    })
}

/// Full export: host scene → interchange → native file. Selects the
/// objects matching the export switches, has the host write the
/// interchange file, then runs the console on it.
pub fn export_scene(
    ctx: &BridgeContext,
    scene: &mut dyn SceneGraph,
    install: &Install,
    target: &Path,
    opts: &ExportOptions,
) -> Result<()> {
    let target = ensure_native_extension(target);
    info!("exporting scene to native file: {}", target.display());

    let pool: Vec<String> = if opts.selected_only {
        scene.selected_names()
    } else {
        scene.object_names()
    };
    scene.deselect_all();

    let mut matched = 0usize;
    for name in &pool {
        let Ok(kind) = scene.kind(name) else { continue };
        if opts.wants(kind) {
            scene.select(name)?;
            matched += 1;
        }
    }
    if matched == 0 {
        scene.deselect_all();
        warn!("no objects match the export filters; nothing to export");
        return Err(BridgeError::precondition(
            "no objects match the export filters",
        ));
    }
    info!("exporting {matched} objects to the interchange file");

    let scratch = ctx.scratch_dir("export_")?;
    let interchange = scratch.path().join("bridge_export.fbx");
    scene.export_interchange(&interchange, true, opts.animations)?;
    scene.deselect_all();
    require_artifact(&interchange)?;

    convert_interchange_to_native(ctx, install, &interchange, &target)
}

fn run_console(ctx: &BridgeContext, install: &Install, script_body: &str) -> Result<()> {
    let envs = invoker::converter_env(install);
    let run = invoker::invoke(&install.console, script_body, &envs, ctx.timeout)?;
    if !run.success() {
        return Err(BridgeError::conversion(format!(
            "external converter exited with code {}; {}",
            run.exit_code,
            ctx.log_pointer(),
        )));
    }
    Ok(())
}

/// Existence and non-zero size are the only properties checked on an
/// interchange or native artifact; its contents are opaque here.
fn require_artifact(path: &Path) -> Result<()> {
    let meta = fs::metadata(path)
        .map_err(|_| BridgeError::precondition(format!("file not found: {}", path.display())))?;
    if meta.len() == 0 {
        return Err(BridgeError::precondition(format!(
            "file is empty: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Same check, but a failure after a supposedly successful run is a
/// conversion failure, not a precondition one.
fn require_output(ctx: &BridgeContext, path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        _ => Err(BridgeError::conversion(format!(
            "converter reported success but produced no usable output at {}; {}",
            path.display(),
            ctx.log_pointer(),
        ))),
    }
}

fn require_extension(path: &Path, ext: &str) -> Result<()> {
    let ok = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(BridgeError::precondition(format!(
            "expected a .{ext} file, got: {}",
            path.display()
        )))
    }
}

fn ensure_native_extension(path: &Path) -> PathBuf {
    let ok = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(NATIVE_EXT))
        .unwrap_or(false);
    if ok {
        path.to_path_buf()
    } else {
        path.with_extension(NATIVE_EXT)
    }
}

fn interchange_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    format!("bridge_import_{stem}.{INTERCHANGE_EXT}")
}
