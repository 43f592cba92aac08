//! Element inspector CLI
//!
//! Opens (or attaches to) a Chrome/Chromium instance, injects the inspector
//! into the target page, and polls for captured elements. Each capture is
//! rendered as a text report, printed to stdout, and copied to the
//! clipboard (the screenshot, when available, is copied as a separate
//! image).

use anyhow::Context;
use clap::Parser;
use element_inspector::{
    BrowserSession, ConnectionOptions, Inspector, InspectorConfig, LaunchOptions, ReportClipboard, report,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "element-inspector", version, about = "Visually inspect DOM elements on a live page")]
struct Cli {
    /// URL to open and inspect
    #[arg(long)]
    url: Option<String>,

    /// Attach to a running browser over this DevTools WebSocket URL instead
    /// of launching one
    #[arg(long)]
    ws_url: Option<String>,

    /// Launch the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Capture a single element by CSS selector, print its report, and exit
    #[arg(long)]
    capture: Option<String>,

    /// Exit after this many interactive captures (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    max_captures: usize,

    /// Local copy of the rendering library to inject for screenshots
    #[arg(long)]
    renderer_path: Option<PathBuf>,

    /// URL of the rendering library, tried before the public CDN
    #[arg(long)]
    renderer_url: Option<String>,

    /// Delay before capturing an interactive element, in milliseconds
    #[arg(long, default_value_t = 500)]
    settle_delay_ms: u64,

    /// Capture-queue poll interval, in milliseconds
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Print reports without writing them to the clipboard
    #[arg(long)]
    no_clipboard: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let session = match &cli.ws_url {
        Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url))
            .context("Failed to connect to the browser")?,
        None => BrowserSession::launch(LaunchOptions::new().headless(!cli.headed))
            .context("Failed to launch the browser")?,
    };

    if let Some(url) = &cli.url {
        session.navigate(url).with_context(|| format!("Failed to open {}", url))?;
        session.wait_for_navigation().context("Page did not finish loading")?;
    }

    let mut config = InspectorConfig::new().settle_delay_ms(cli.settle_delay_ms);
    if let Some(path) = &cli.renderer_path {
        config = config.renderer_path(path);
    }
    if let Some(url) = &cli.renderer_url {
        config = config.renderer_url(url);
    }

    let mut inspector = Inspector::attach(&session, config).context("Failed to inject the inspector")?;

    let mut clipboard = if cli.no_clipboard {
        None
    } else {
        match ReportClipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("Clipboard unavailable, printing reports only: {}", e);
                None
            }
        }
    };

    // One-shot programmatic capture
    if let Some(selector) = &cli.capture {
        let record = inspector
            .capture_selector(selector)
            .with_context(|| format!("Failed to capture '{}'", selector))?;

        let text = match clipboard.as_mut() {
            Some(clipboard) => inspector.publish(&record, clipboard)?,
            None => report::format_report(&record),
        };
        println!("{}", text);
        return Ok(());
    }

    inspector.activate().context("Failed to arm inspect mode")?;
    eprintln!("Inspect mode armed. Right-click elements in the browser to capture them (Escape disarms).");

    let mut captured = 0usize;
    loop {
        std::thread::sleep(Duration::from_millis(cli.poll_interval_ms));

        let records = match inspector.poll() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Poll failed: {}", e);
                continue;
            }
        };

        for record in &records {
            let text = match clipboard.as_mut() {
                Some(clipboard) => inspector.publish(record, clipboard)?,
                None => report::format_report(record),
            };
            println!("{}", text);

            captured += 1;
            if cli.max_captures > 0 && captured >= cli.max_captures {
                eprintln!("Captured {} element(s), exiting.", captured);
                inspector.destroy()?;
                return Ok(());
            }
        }
    }
}
