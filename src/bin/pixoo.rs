use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixoo", version)]
struct Cli {
    /// JSON config file (device address, size, hub credentials).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device IP; overrides the config file.
    #[arg(long, global = true)]
    ip: Option<String>,

    /// Matrix side in pixels (16, 32 or 64); overrides the config file.
    #[arg(long, global = true)]
    size: Option<u32>,

    /// Letterbox color for non-square images, `#RRGGBB`.
    #[arg(long, global = true, default_value = "#000000")]
    fill: pixoo::Rgb8,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the first frame of an image and write it as PNG. No device needed.
    Preview(PreviewArgs),
    #[command(flatten)]
    Device(DeviceCommand),
}

#[derive(Subcommand, Debug)]
enum DeviceCommand {
    /// Show an image or animation from a file path or http(s) URL.
    #[command(alias = "gif")]
    Image(ImageArgs),
    /// Show a QR code for an already-encoded payload.
    Qr(QrArgs),
    /// Show the album art of the configured media player.
    Album,
    /// Add or replace a text overlay.
    Text(TextArgs),
    /// Remove all text overlays.
    ClearText,
    /// Set brightness in percent (clamped to 0-100).
    Brightness { percent: i64 },
    /// Turn the screen on or off.
    Screen { state: ScreenState },
    /// Switch channel: faces, cloud, visualizer, custom or black.
    Channel { channel: pixoo::Channel },
    /// List the fonts available for text overlays.
    Fonts,
    /// List devices the cloud sees on this LAN.
    Devices,
    /// Restart animation ids at 1.
    ResetId,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// File path or http(s) URL.
    source: String,
}

#[derive(Parser, Debug)]
struct QrArgs {
    payload: String,

    #[arg(long, default_value = "#000000")]
    fg: pixoo::Rgb8,

    #[arg(long, default_value = "#FFFFFF")]
    bg: pixoo::Rgb8,
}

#[derive(Parser, Debug)]
struct TextArgs {
    text: String,

    /// Overlay slot, 0-19. Reusing a slot replaces its text.
    #[arg(long, default_value_t = 0)]
    id: u8,

    #[arg(long, default_value_t = 0)]
    x: u32,

    #[arg(long, default_value_t = 0)]
    y: u32,

    #[arg(long, default_value_t = 0)]
    font: u32,

    #[arg(long, default_value = "#FFFF00")]
    color: pixoo::Rgb8,

    /// Text box width in pixels (16-64).
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Milliseconds per scroll step.
    #[arg(long, default_value_t = 100)]
    speed: u32,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image or GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScreenState {
    On,
    Off,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.cmd {
        Command::Preview(args) => cmd_preview(&cli, args),
        Command::Device(cmd) => run_on_device(&cli, cmd),
    }
}

fn run_on_device(cli: &Cli, cmd: &DeviceCommand) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let mut session = pixoo::DeviceSession::from_config(&config.device)?.with_fill(cli.fill);

    match cmd {
        DeviceCommand::Image(args) => {
            let report = if is_url(&args.source) {
                session.send_image_url(&args.source)?
            } else {
                session.send_image_path(&args.source)?
            };
            eprintln!(
                "sent {} frame(s) as animation {}",
                report.frames_sent, report.identity.0
            );
        }
        DeviceCommand::Qr(args) => {
            let style = pixoo::QrStyle {
                fill: args.fg,
                back: args.bg,
                ..pixoo::QrStyle::default()
            };
            session.send_qr(&args.payload, style)?;
        }
        DeviceCommand::Album => {
            let hub_cfg = config
                .homeassistant
                .as_ref()
                .context("album needs a 'homeassistant' section in the config file")?;
            let hub = pixoo::HubClient::from_config(hub_cfg)?;
            if session.send_album_art(&hub)?.is_none() {
                eprintln!("nothing is playing on {}", hub.entity_id());
            }
        }
        DeviceCommand::Text(args) => {
            let mut overlay =
                pixoo::TextOverlay::new(pixoo::TextId::new(args.id)?, args.text.as_str());
            overlay.x = args.x;
            overlay.y = args.y;
            overlay.font = args.font;
            overlay.color = args.color;
            overlay.width = args.width;
            overlay.speed_ms = args.speed;
            session.send_text(&overlay)?;
        }
        DeviceCommand::ClearText => {
            session.clear_text()?;
        }
        DeviceCommand::Brightness { percent } => {
            session.set_brightness(*percent)?;
        }
        DeviceCommand::Screen { state } => {
            session.set_screen(matches!(state, ScreenState::On))?;
        }
        DeviceCommand::Channel { channel } => {
            session.select_channel(*channel)?;
        }
        DeviceCommand::Fonts => {
            for font in session.ensure_fonts_loaded()? {
                println!("{:>4}  {}", font.id, font.name);
            }
        }
        DeviceCommand::Devices => {
            for device in session.ensure_devices_loaded()? {
                println!(
                    "{}  {}  {}",
                    device.device_private_ip, device.device_name, device.device_id
                );
            }
        }
        DeviceCommand::ResetId => {
            session.reset_animation_identity()?;
        }
    }

    if let Some(code) = session.state().last_error_code().filter(|&c| c != 0) {
        anyhow::bail!("device answered error_code {code}");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<pixoo::PixooConfig> {
    let mut config = match (&cli.config, &cli.ip) {
        (Some(path), _) => pixoo::PixooConfig::from_path(path)?,
        (None, Some(ip)) => pixoo::PixooConfig {
            device: pixoo::DeviceConfig::new(ip.clone(), pixoo::MatrixSize::default()),
            homeassistant: None,
        },
        (None, None) => anyhow::bail!("pass --ip or --config"),
    };
    if let Some(ip) = &cli.ip {
        config.device.ip = ip.clone();
    }
    if let Some(side) = cli.size {
        config.device.size = pixoo::MatrixSize::new(side)?;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_preview(cli: &Cli, args: &PreviewArgs) -> anyhow::Result<()> {
    let size = match cli.size {
        Some(side) => pixoo::MatrixSize::new(side)?,
        None => pixoo::MatrixSize::default(),
    };
    let mut frames = pixoo::DecodedFrames::open(&args.in_path)?;
    let fitted = pixoo::preview_frame(&mut frames, size, cli.fill)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fitted
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
