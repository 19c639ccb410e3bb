//! Spawns the external scripting console on a generated script and waits
//! for it, bounded by the operation timeout.

use crate::discovery::Install;
use crate::error::{BridgeError, Result};
use log::{debug, error, info};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured result of one console run. A nonzero exit code is a hard
/// failure for the caller; the invoker itself only reports it.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Environment overrides for the external console: its bin directory
/// prepended to the search path, plus the fixed variables locating the
/// install root, plugins, scripts, and the I/O text encoding.
pub fn converter_env(install: &Install) -> Vec<(String, String)> {
    let bin_dir = install
        .console
        .parent()
        .unwrap_or(install.root.as_path())
        .to_path_buf();
    let path = std::env::var("PATH").unwrap_or_default();
    let sep = if cfg!(windows) { ';' } else { ':' };
    vec![
        (
            "ADSK_3DSMAX_x64_2026".into(),
            install.root.display().to_string(),
        ),
        (
            "ADSK_3DSMAX_PLUGINS_PATH".into(),
            install.root.join("plugins").display().to_string(),
        ),
        (
            "ADSK_3DSMAX_SCRIPTS_PATH".into(),
            install.root.join("scripts").display().to_string(),
        ),
        ("PYTHONIOENCODING".into(), "UTF-8".into()),
        ("PATH".into(), format!("{}{}{}", bin_dir.display(), sep, path)),
    ]
}

/// Runs `exe <script>` with the script body written to a single-use temp
/// file. The file lives for the duration of the call only; the tempfile
/// guard removes it on every exit path.
///
/// Errors: [`BridgeError::ProcessNotFound`] if `exe` is missing (checked
/// before anything is spawned), [`BridgeError::Timeout`] if the process
/// outlives `timeout` (it is killed and any partial output file must not
/// be consumed). A nonzero exit code is returned as data, never retried.
pub fn invoke(
    exe: &Path,
    script_body: &str,
    envs: &[(String, String)],
    timeout: Duration,
) -> Result<Invocation> {
    if !exe.exists() {
        return Err(BridgeError::ProcessNotFound(exe.to_path_buf()));
    }

    let mut script = tempfile::Builder::new()
        .prefix("maxbridge_")
        .suffix(".ms")
        .tempfile()?;
    script.write_all(script_body.as_bytes())?;
    script.flush()?;
    debug!("wrote console script to {}", script.path().display());

    let mut command = Command::new(exe);
    command
        .arg(script.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }

    info!("running external converter: {}", exe.display());
    let mut child = command.spawn()?;

    let stdout_reader = child.stdout.take().map(drain_pipe);
    let stderr_reader = child.stderr.take().map(drain_pipe);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            error!(
                "external converter exceeded {} second timeout, killing it",
                timeout.as_secs()
            );
            let _ = child.kill();
            let _ = child.wait();
            return Err(BridgeError::Timeout(timeout.as_secs()));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = join_pipe(stdout_reader);
    let stderr = join_pipe(stderr_reader);
    let exit_code = status.code().unwrap_or(-1);

    if !stdout.is_empty() {
        debug!("converter stdout:\n{}", stdout.trim_end());
    }
    if !stderr.is_empty() {
        error!("converter stderr:\n{}", stderr.trim_end());
    }
    debug!("external converter exited with code {exit_code}");

    Ok(Invocation {
        exit_code,
        stdout,
        stderr,
    })
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_pipe(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_executable_is_process_not_found() {
        let bogus = PathBuf::from("/definitely/not/here/3dsmaxbatch.exe");
        let err = invoke(&bogus, "quitMax exitCode:0\n", &[], Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, BridgeError::ProcessNotFound(p) if p == bogus));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_and_stdout_are_captured() {
        let run = invoke(
            Path::new("/bin/sh"),
            "echo converted\nexit 0\n",
            &[],
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(run.success());
        assert_eq!(run.stdout.trim(), "converted");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_reported_not_raised() {
        let run = invoke(
            Path::new("/bin/sh"),
            "echo boom >&2\nexit 2\n",
            &[],
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(!run.success());
        assert_eq!(run.exit_code, 2);
        assert_eq!(run.stderr.trim(), "boom");
    }

    #[cfg(unix)]
    #[test]
    fn overlong_run_times_out() {
        let err = invoke(
            Path::new("/bin/sh"),
            "sleep 30\n",
            &[],
            Duration::from_millis(300),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
    }

    #[cfg(unix)]
    #[test]
    fn environment_overrides_reach_the_process() {
        let envs = vec![("PYTHONIOENCODING".to_string(), "UTF-8".to_string())];
        let run = invoke(
            Path::new("/bin/sh"),
            "printf '%s' \"$PYTHONIOENCODING\"\n",
            &envs,
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(run.stdout, "UTF-8");
    }
}
