use std::path::PathBuf;

use anyhow::Context;
use grbltrack::{init_logging, render_report, replay_file, Config, Session, BUILD_DATE, VERSION};

const USAGE: &str = "usage: grbltrack <capture-file> [config-file] [--json] [--strict]";

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut json = false;
    let mut strict = false;
    let mut paths = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--strict" => strict = true,
            "--version" => {
                println!("grbltrack {} ({})", VERSION, BUILD_DATE);
                return Ok(());
            }
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    let mut paths = paths.into_iter();
    let capture = paths.next().context(USAGE)?;

    let config = match paths.next() {
        Some(path) => Config::load_from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path),
            Err(e) => {
                tracing::warn!("{}, using default config", e);
                Config::default()
            }
        },
    };

    let mut session = Session::with_display(config.display_options());
    let summary = replay_file(&mut session, &capture, strict)
        .with_context(|| format!("failed to replay capture {}", capture.display()))?;
    tracing::info!("Replayed {} lines from {}", summary.lines, capture.display());

    if json {
        let output = serde_json::json!({
            "summary": summary,
            "session": session.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render_report(&session, &summary, &config.envelope()));
    }

    Ok(())
}
