use clap::Parser;
use std::path::PathBuf;

use tensorprep::{ResizeMethod, TensorLayout};

#[derive(Parser)]
#[command(
    name = "tensorprep",
    version,
    about = "Smoke checks for the tensorprep library"
)]
pub struct CliArgs {
    /// Input image (JPEG or PNG)
    #[arg(short, long, default_value = "city.jpg")]
    pub input: PathBuf,

    /// Directory for the images written by the image check
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON file with tensor-input parameters; overrides the size/method/layout flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tensor width
    #[arg(long, default_value_t = 128)]
    pub width: u32,

    /// Tensor height
    #[arg(long, default_value_t = 128)]
    pub height: u32,

    /// Resize method for the tensor input
    #[arg(long, value_enum, default_value_t = ResizeMethod::Area)]
    pub method: ResizeMethod,

    /// Tensor layout (nchw or nhwc)
    #[arg(long, value_enum, default_value_t = TensorLayout::PixelMajor)]
    pub layout: TensorLayout,

    /// Worker threads (-1 = all cores)
    #[arg(long, allow_hyphen_values = true)]
    pub threads: Option<i32>,

    /// Enable fast mode (fixed-point resize, table normalization)
    #[arg(long, default_value_t = false)]
    pub fast_mode: bool,

    /// JPEG quality for written images
    #[arg(long, default_value_t = 85)]
    pub quality: u8,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
