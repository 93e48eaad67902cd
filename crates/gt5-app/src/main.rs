//! Main application entry point (native).

#[cfg(feature = "native")]
mod cli;

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    let args = cli::CliArgs::parse();

    if args.shortcuts {
        println!("{}", gt5_core::ShortcutRegistry::help_text());
        return std::process::ExitCode::SUCCESS;
    }

    match pollster::block_on(run(args)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("gt5: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "native")]
async fn run(args: cli::CliArgs) -> Result<(), gt5_app::AppError> {
    use gt5_app::{App, load_script};
    use gt5_core::DrawingConfig;
    use gt5_core::storage::FileStorage;
    use std::sync::Arc;

    let config = DrawingConfig::from_env()?;
    let storage = match &args.data_dir {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    log::info!("Saved drawings in {}", storage.base_path().display());

    let events = load_script(&args.script)?;
    log::info!("Replaying {} events from {}", events.len(), args.script.display());

    let mut app = App::new(config, Arc::new(storage), args.output_dir.clone());
    let summary = app.replay(events).await?;
    println!(
        "{} events applied, {} rejected, {} strokes on {} layers",
        summary.applied,
        summary.rejected,
        app.store().lines().len(),
        app.store().layers().len()
    );
    for id in &summary.saved {
        println!("saved drawing {id}");
    }
    for path in &summary.exported {
        println!("exported {}", path.display());
    }

    if let Some(format) = &args.export {
        let path = app.export_to_file(format.parse().map_err(gt5_app::AppError::Export)?, None)?;
        println!("exported {}", path.display());
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
