use anyhow::{Context, bail};
use log::info;
use maxbridge_rs::context::BridgeContext;
use maxbridge_rs::discovery::{Discovery, Install, KnownRoots, best};
use maxbridge_rs::settings::Settings;
use maxbridge_rs::transfer;
use std::path::{Path, PathBuf};

fn usage() -> ! {
    eprintln!(
        "usage: maxbridge-rs <command> [args]\n\
         \n\
         commands:\n\
         \x20 to-fbx <input.max> <output.fbx>   convert a native scene to an interchange file\n\
         \x20 to-max <input.fbx> <output.max>   convert an interchange file to a native scene\n\
         \x20 discover                          list detected installs, best first"
    );
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let settings = Settings::load();

    match args.get(1).map(String::as_str) {
        Some("discover") => {
            let strategy = roots_from(&settings);
            let found = strategy.candidates();
            if found.is_empty() {
                bail!("no installs found; set the console path in the converter settings");
            }
            for install in found {
                println!(
                    "{:6.1}  {}",
                    install.version,
                    install.console.display()
                );
            }
            Ok(())
        }
        Some("to-fbx") if args.len() == 4 => {
            let (ctx, install) = session(&settings)?;
            transfer::convert_native_to_interchange(
                &ctx,
                &install,
                Path::new(&args[2]),
                Path::new(&args[3]),
            )?;
            info!("wrote {}", args[3]);
            Ok(())
        }
        Some("to-max") if args.len() == 4 => {
            let (ctx, install) = session(&settings)?;
            transfer::convert_interchange_to_native(
                &ctx,
                &install,
                Path::new(&args[2]),
                Path::new(&args[3]),
            )?;
            info!("wrote {}", args[3]);
            Ok(())
        }
        _ => usage(),
    }
}

fn roots_from(settings: &Settings) -> KnownRoots {
    KnownRoots::new(settings.converter.search_roots.iter().map(PathBuf::from))
}

fn session(settings: &Settings) -> anyhow::Result<(BridgeContext, Install)> {
    let ctx = BridgeContext::in_temp_dir().context("creating bridge cache directory")?;

    let install = if settings.converter.console_path.is_empty() {
        best(&roots_from(settings))
            .context("no install of the external application found; run `discover` or set the console path")?
    } else {
        let console = PathBuf::from(&settings.converter.console_path);
        let root = console
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| console.clone());
        Install {
            root,
            console,
            version: 0.0,
        }
    };
    Ok((ctx, install))
}
