//! Generated batch scripts for the external scripting console.
//!
//! Each script is three fixed commands: reset or load a file, import or
//! export the other file, then save or quit. Paths are slash-normalized
//! and `@"..."`-quoted so the console takes them verbatim on any
//! platform. A script is written once, consumed once, and deleted by the
//! invoker.

use std::path::Path;

/// Forward slashes regardless of platform; the console accepts them
/// everywhere and they avoid escape trouble inside the quoted literal.
pub fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn quoted(path: &Path) -> String {
    format!("@\"{}\"", normalize(path))
}

/// Script for the export direction: the console imports the interchange
/// file and saves it as a native scene file.
pub fn export_script(interchange: &Path, native_target: &Path) -> String {
    format!(
        "resetMaxFile #noPrompt\n\
         importFile {} #noPrompt\n\
         saveMaxFile {} quiet:true\n\
         quitMax exitCode:0\n",
        quoted(interchange),
        quoted(native_target),
    )
}

/// Script for the import direction: the console loads a native scene file
/// and exports it as an interchange file.
pub fn import_script(native_source: &Path, interchange: &Path) -> String {
    format!(
        "loadMaxFile {} quiet:true\n\
         exportFile {} #noPrompt selectedOnly:false\n\
         quitMax exitCode:0\n",
        quoted(native_source),
        quoted(interchange),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn paths_are_slash_normalized_and_quoted() {
        let script = import_script(
            &PathBuf::from(r"C:\scenes\tower.max"),
            &PathBuf::from(r"C:\cache\tower.fbx"),
        );
        assert!(script.contains("@\"C:/scenes/tower.max\""));
        assert!(script.contains("@\"C:/cache/tower.fbx\""));
        assert!(!script.contains('\\'));
    }

    #[test]
    fn import_script_has_load_export_quit() {
        let script = import_script(Path::new("in.max"), Path::new("out.fbx"));
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("loadMaxFile"));
        assert!(lines[1].starts_with("exportFile"));
        assert_eq!(lines[2], "quitMax exitCode:0");
    }

    #[test]
    fn export_script_has_reset_import_save_quit() {
        let script = export_script(Path::new("scene.fbx"), Path::new("scene.max"));
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "resetMaxFile #noPrompt");
        assert!(lines[1].starts_with("importFile"));
        assert!(lines[2].starts_with("saveMaxFile"));
        assert_eq!(lines[3], "quitMax exitCode:0");
    }
}
