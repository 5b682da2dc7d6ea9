use std::path::PathBuf;

use clap::Parser;
use log::{error, info, LevelFilter};
use srs_extract::{run, ExtractConfig, ExtractMode};
use srs_types::FormatProfile;

#[derive(Parser, Debug)]
#[command(
    name = "srs-extract",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract time-resolved and background spectra from FTIR .srs files",
    long_about = None,
)]
struct Cli {
    /// Путь к .srs файлу
    srs: PathBuf,
    /// Режим записи: fast (Rapid Scan), realtime
    #[arg(short, long)]
    mode: String,
    /// Каталог для таблиц
    #[arg(short, long, default_value = "output")]
    outdir: PathBuf,
    /// Начало диапазона волновых чисел, см⁻¹ (иначе спросить)
    #[arg(long, allow_negative_numbers = true)]
    start: Option<f64>,
    /// Конец диапазона волновых чисел, см⁻¹ (иначе спросить)
    #[arg(long, allow_negative_numbers = true)]
    end: Option<f64>,
    /// Профиль payload: rapid, rapid-600, rapid-v2, rapid-estimated, realtime
    #[arg(long)]
    profile: Option<String>,
    /// Профиль для файлов с ложным кадром #0 (rapid-600 или rapid-v2)
    #[arg(long)]
    pseudo_profile: Option<String>,
    /// JSON с набором фоновых маркеров
    #[arg(long)]
    bg_markers: Option<PathBuf>,
    /// Шаг между фоновыми блоками, байт (по умолчанию 9040)
    #[arg(long)]
    bg_interval: Option<usize>,
    /// Поправка начала фона при сканировании, байт
    #[arg(long, allow_negative_numbers = true)]
    bg_offset: Option<i64>,
    /// Шаг сканирования, байт (по умолчанию 512)
    #[arg(long)]
    bg_scan_step: Option<usize>,
    /// Ограничение числа кадров
    #[arg(long)]
    max_frames: Option<usize>,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
}

fn parse_profile(
    flag: &str,
    value: Option<&str>,
) -> Option<FormatProfile> {
    let name = value?;

    match name.parse::<FormatProfile>() {
        Ok(p) => Some(p),
        Err(e) => {
            error!("{flag}: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let mode: ExtractMode = match cli.mode.parse() {
        Ok(m) => m,
        Err(e) => {
            error!("--mode: {e}");
            std::process::exit(1);
        }
    };

    let config = ExtractConfig {
        input: cli.srs.clone(),
        mode,
        outdir: cli.outdir.clone(),
        start_wn: cli.start,
        end_wn: cli.end,
        profile: parse_profile("--profile", cli.profile.as_deref()),
        pseudo_profile: parse_profile("--pseudo-profile", cli.pseudo_profile.as_deref()),
        bg_markers: cli.bg_markers.clone(),
        bg_interval: cli.bg_interval,
        bg_offset: cli.bg_offset,
        bg_scan_step: cli.bg_scan_step,
        max_frames: cli.max_frames,
    };

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {:?}", config.input);
    info!("  Mode          : {}", config.mode);
    info!("  Output dir    : {:?}", config.outdir);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match run(&config) {
        Ok(summary) => {
            info!("\n{summary}");
            info!("✓ Extraction complete");
        }
        Err(e) => {
            error!("Extraction failed: {e}");
            std::process::exit(1);
        }
    }
}
