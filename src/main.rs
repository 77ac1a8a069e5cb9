// fi-pdf2en - translate a Finnish PDF to English locally
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Instant;

use fi_pdf2en::config::{self, DevicePreference, Settings};
use fi_pdf2en::output::write_lines;
use fi_pdf2en::pdf_extraction::{OcrEngine, SystemPdfRenderer, TesseractOcr};
use fi_pdf2en::{Pipeline, PipelineOptions, TranslationEngine, TranslatorError};

#[derive(Parser, Debug)]
#[command(name = "fi-pdf2en", version, about = "Translate Finnish PDF -> English (local OCR + Marian)")]
struct Args {
    /// Input PDF
    pdf: PathBuf,

    /// Output TXT file
    #[arg(short, long, default_value = config::OUTPUT_PATH)]
    out: PathBuf,

    /// Force OCR even for digital PDFs
    #[arg(long)]
    prefer_ocr: bool,

    /// Batch size for translation
    #[arg(long, value_parser = parse_batch_size)]
    batch_size: Option<usize>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model identifier or directory
    #[arg(long)]
    model: Option<String>,

    /// Directory holding exported models
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Run inference on the CPU even if an accelerator is available
    #[arg(long)]
    cpu: bool,

    /// Tesseract language code
    #[arg(long)]
    ocr_lang: Option<String>,

    /// Rasterization resolution for OCR
    #[arg(long)]
    dpi: Option<u32>,

    /// Visible characters needed to skip OCR
    #[arg(long)]
    min_text_chars: Option<usize>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors, no progress bars
    #[arg(short, long)]
    quiet: bool,
}

fn parse_batch_size(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("warn,fi_pdf2en={}", level)),
    )
    .format_target(false)
    .init();
}

fn build_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if args.prefer_ocr {
        settings.scan.prefer_ocr = true;
    }
    if let Some(n) = args.min_text_chars {
        settings.scan.min_text_chars = n;
    }
    if let Some(lang) = &args.ocr_lang {
        settings.ocr.language = lang.clone();
    }
    if let Some(dpi) = args.dpi {
        settings.ocr.dpi = dpi;
    }
    if let Some(n) = args.batch_size {
        settings.translation.batch_size = n;
    }
    if let Some(model) = &args.model {
        settings.translation.model = model.clone();
    }
    if let Some(dir) = &args.models_dir {
        settings.translation.models_dir = Some(dir.clone());
    }
    if args.cpu {
        settings.translation.device = DevicePreference::Cpu;
    }

    settings.validate()?;
    Ok(settings)
}

fn run(args: &Args, settings: &Settings) -> Result<()> {
    let start = Instant::now();

    if !args.pdf.is_file() {
        return Err(TranslatorError::Input(format!(
            "input PDF not found: {}",
            args.pdf.display()
        ))
        .into());
    }

    let model_dir = settings.model_dir();
    log::info!("initializing translator from {}", model_dir.display());
    let engine = TranslationEngine::initialize(&model_dir, &settings.translation)
        .context("initializing translator")?;

    let ocr = TesseractOcr::new(settings.ocr.tesseract.clone());
    if !ocr.is_available() {
        log::warn!(
            "{} not found on PATH, scanned documents cannot be read",
            ocr.program()
        );
    }

    let mut options = PipelineOptions::from(settings);
    options.show_progress = !args.quiet;

    log::info!("extracting text from {}", args.pdf.display());
    let pipeline = Pipeline::new(&engine, &ocr, options);
    let report = pipeline
        .run_file(&args.pdf, SystemPdfRenderer::new(settings.ocr.pdftoppm.clone()))
        .with_context(|| format!("translating {}", args.pdf.display()))?;

    log::info!("writing output -> {}", args.out.display());
    write_lines(&args.out, &report.lines)
        .with_context(|| format!("writing {}", args.out.display()))?;

    log::info!(
        "done: {} pages ({}), {} sentences in {:.1?}",
        report.page_count,
        report.verdict,
        report.lines.len(),
        start.elapsed()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);
    let settings = build_settings(&args)?;
    run(&args, &settings)
}
