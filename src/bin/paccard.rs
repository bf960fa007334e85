use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paccard::{
    CardConfig, CardRasterizer, ControlPanel, DirectoryDownloads, Edit, ExportFinished,
    FfmpegCaptureHost, FontLibrary, RecordingStatus, Studio, StudioSettings, SystemWallClock,
};

#[derive(Parser, Debug)]
#[command(name = "paccard", version)]
struct Cli {
    /// Studio settings JSON (viewport, capture, fonts, downloads).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// More logging (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default card configuration as JSON.
    Defaults,
    /// Print the visual tree for a card (or the whole stage) as JSON.
    Tree(TreeArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the control panel description as JSON.
    Panel(CardArgs),
    /// Record a fixed-length WebM clip of the stage (requires `ffmpeg` on PATH).
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Card configuration JSON. Missing fields take their defaults.
    #[arg(long)]
    card: Option<PathBuf>,

    /// Field override, `field=value` (repeatable), e.g. `--set theme=mario`.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Print the page-level stage instead of the card alone.
    #[arg(long)]
    stage: bool,

    /// Compose the stage as it looks while recording.
    #[arg(long, requires = "stage")]
    recording: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Animation time in milliseconds.
    #[arg(long, default_value_t = 0)]
    time_ms: u64,

    /// Render only the card at 1x instead of the whole viewport.
    #[arg(long)]
    card_only: bool,

    /// Compose the stage as it looks while recording.
    #[arg(long, conflicts_with = "card_only")]
    recording: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Directory the clip is written to (overrides settings).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.settings.as_deref())?;
    match cli.cmd {
        Command::Defaults => print_json(&CardConfig::default()),
        Command::Tree(args) => cmd_tree(&settings, args),
        Command::Frame(args) => cmd_frame(&settings, args),
        Command::Panel(args) => {
            let config = load_card(&args)?;
            print_json(&ControlPanel::describe(&config, RecordingStatus::Idle))
        }
        Command::Export(args) => cmd_export(settings, args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<StudioSettings> {
    let settings = match path {
        Some(p) => StudioSettings::load(p)
            .with_context(|| format!("load settings '{}'", p.display()))?,
        None => StudioSettings::from_env(),
    };
    settings.validate().context("validate settings")?;
    Ok(settings)
}

fn load_card(args: &CardArgs) -> anyhow::Result<CardConfig> {
    let mut config = match &args.card {
        Some(p) => {
            CardConfig::load(p).with_context(|| format!("load card '{}'", p.display()))?
        }
        None => CardConfig::default(),
    };
    for raw in &args.set {
        let edit: Edit = raw
            .parse()
            .with_context(|| format!("parse --set '{raw}'"))?;
        config = ControlPanel::apply(&config, edit);
    }
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize JSON")?;
    println!("{out}");
    Ok(())
}

fn status_for(recording: bool) -> RecordingStatus {
    if recording {
        RecordingStatus::Recording
    } else {
        RecordingStatus::Idle
    }
}

fn cmd_tree(settings: &StudioSettings, args: TreeArgs) -> anyhow::Result<()> {
    let config = load_card(&args.card)?;
    if args.stage {
        let stage = paccard::render_stage(&config, status_for(args.recording), settings.viewport);
        print_json(&stage)
    } else {
        print_json(&paccard::render(&config, settings.viewport))
    }
}

fn cmd_frame(settings: &StudioSettings, args: FrameArgs) -> anyhow::Result<()> {
    let config = load_card(&args.card)?;
    let fonts = FontLibrary::new(settings.fonts_dir.as_deref());
    let mut rasterizer = CardRasterizer::new(fonts);

    let frame = if args.card_only {
        let card = paccard::render(&config, settings.viewport);
        rasterizer.render_card(&card, args.time_ms, 1.0)?
    } else {
        let stage = paccard::render_stage(&config, status_for(args.recording), settings.viewport);
        let (w, h) = (
            settings.viewport.width.round() as u32,
            settings.viewport.height.round() as u32,
        );
        rasterizer.render_stage(&stage, args.time_ms, w, h)?
    };

    frame
        .write_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(mut settings: StudioSettings, args: ExportArgs) -> anyhow::Result<()> {
    let config = load_card(&args.card)?;
    if let Some(dir) = args.out_dir {
        settings.downloads_dir = dir;
    }

    let fonts = FontLibrary::new(settings.fonts_dir.as_deref());
    let mut host = FfmpegCaptureHost::new(CardRasterizer::new(fonts), Some(settings.capture));
    let mut downloads = DirectoryDownloads::new(settings.downloads_dir.clone());
    let mut studio = Studio::new(settings, config);

    match studio.run_export(&mut host, &mut downloads, &SystemWallClock)? {
        ExportFinished::Completed(outcome) => {
            eprintln!("wrote {} ({} bytes)", outcome.path.display(), outcome.bytes);
            println!("{}", outcome.path.display());
            Ok(())
        }
        ExportFinished::Aborted(reason) => anyhow::bail!("export aborted: {reason}"),
    }
}
