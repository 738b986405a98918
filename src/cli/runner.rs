use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tensorprep::settings::{self, RuntimeSettings};
use tensorprep::{
    ImageFileFormat, InputParams, PixelFormat, Position, Rect, ResizeMethod, load,
    prepare_buffer_into, resize, save, system_info, tensor_len,
};

use super::args::CliArgs;
use super::errors::AppError;

fn print_info_check() {
    print!("\nPrintInfoCheck: ");
    print!("{}. ", system_info());
    println!("OK.");
}

fn settings_check() -> Result<(), AppError> {
    print!("\nSettingsCheck: ");
    let saved = RuntimeSettings::current();

    settings::set_thread_number(-1);
    settings::set_fast_mode(true);
    print!(
        "thread number: {}, fast mode: {}. ",
        settings::thread_number(),
        settings::fast_mode()
    );

    saved.apply();
    let restored = RuntimeSettings::current();
    if restored != saved {
        return Err(AppError::SettingsNotRestored {
            expected: format!("{:?}", saved),
            actual: format!("{:?}", restored),
        });
    }
    println!("OK.");
    Ok(())
}

fn image_check(input: &Path, output_dir: &Path, quality: u8) -> Result<(), AppError> {
    print!("\nImageCheck: ");
    let image = load(input, Some(PixelFormat::Bgr24))?;
    print!(
        "loaded {} {}x{}, crc32: {:08X}. ",
        image.format(),
        image.width(),
        image.height(),
        image.crc32()
    );

    let rect = image.region_at(image.width() / 2, image.height() / 2, Position::MiddleCenter);
    let center = image.region(rect);
    let format = ImageFileFormat::Jpeg;
    save(
        &center,
        output_dir.join(format!("center.{}", format.extension())),
        format,
        quality,
    )?;

    let mut resized = resize(
        &image,
        (image.width() / 2).max(1),
        (image.height() / 2).max(1),
        ResizeMethod::Bilinear,
    )?;
    resized.fill_pixel(Rect::new(200, 200, 400, 400), &[0, 0, 255])?;
    save(
        &resized,
        output_dir.join(format!("resized.{}", format.extension())),
        format,
        quality,
    )?;
    println!("OK.");
    Ok(())
}

fn set_input_check(input: &Path, params: &InputParams) -> Result<(), AppError> {
    print!("\nSetInputCheck: ");
    let start = Instant::now();
    let image = load(input, params.format)?;
    let channels = image.channel_count();
    let mut tensor = vec![0f32; tensor_len(params.width, params.height, channels)];
    prepare_buffer_into(image, params, &mut tensor)?;

    let (min, max) = tensor
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    info!("Tensor input prepared in {:?}", start.elapsed());
    print!(
        "{}x{}x{} {}, values in [{:.3}, {:.3}]. ",
        params.width, params.height, channels, params.layout, min, max
    );
    println!("OK.");
    Ok(())
}

fn input_params(args: &CliArgs) -> Result<InputParams, AppError> {
    if let Some(path) = &args.config {
        info!("Loading tensor-input parameters from {:?}", path);
        return Ok(InputParams::load(path)?);
    }
    Ok(InputParams {
        width: args.width,
        height: args.height,
        method: args.method,
        layout: args.layout,
        ..InputParams::default()
    })
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if !args.input.is_file() {
        return Err(AppError::MissingInput { path: args.input }.into());
    }
    fs::create_dir_all(&args.output_dir)?;
    if !args.output_dir.is_dir() {
        return Err(AppError::BadOutputDir {
            path: args.output_dir,
        }
        .into());
    }

    if let Some(threads) = args.threads {
        settings::set_thread_number(threads);
    }
    settings::set_fast_mode(args.fast_mode);
    let params = input_params(&args)?;

    println!("Start tensorprep smoke checks:");
    print_info_check();
    settings_check()?;
    image_check(&args.input, &args.output_dir, args.quality)?;
    set_input_check(&args.input, &params)?;
    println!("\ntensorprep smoke checks ended successfully!");
    Ok(())
}
