//! Headless charge-density script generator.
//!
//! Usage: cargo run --bin make_ccd -- --preset nineteen-guarded --name hex19

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use ccd_density_model::form::{self, DetectorPreset, ParameterForm};
use ccd_density_model::{generate, layout_image, rings_needed, script_io};

#[derive(Debug, Parser)]
#[command(about = "Generate a SolidStateDetectors.jl charge-density model for a hexagonal pixel detector")]
struct Args {
    /// Built-in parameter set: default, seven, nineteen-guarded, gaussian, radial-erf.
    #[arg(long, value_name = "PRESET", conflicts_with = "params")]
    preset: Option<String>,
    /// JSON parameter file (lengths in mm); missing fields take default values.
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,
    /// Override the pixel count.
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    pixels: Option<u64>,
    /// Script name, written as NAME.jl.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
    /// Directory the outputs are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
    /// Also write a top-view PNG of the pixel layout.
    #[arg(long, value_name = "FILE")]
    layout_png: Option<PathBuf>,
    /// Edge length of the layout PNG in pixels.
    #[arg(long, value_name = "PIXELS", default_value_t = 768)]
    layout_size: u32,
    /// Print the effective parameters as JSON and exit.
    #[arg(long)]
    dump_params: bool,
}

fn load(args: &Args) -> anyhow::Result<ParameterForm> {
    let mut form = match (&args.preset, &args.params) {
        (Some(key), _) => DetectorPreset::from_key(key)
            .ok_or_else(|| anyhow!("unknown preset '{key}'"))?
            .form(),
        (None, Some(path)) => form::load_form(path).map_err(|e| anyhow!(e))?,
        (None, None) => ParameterForm::default(),
    };
    if let Some(n) = args.pixels {
        form.pixel_count = usize::try_from(n).context("pixel count out of range")?;
    }
    if let Some(name) = &args.name {
        form.name = name.clone();
    }
    Ok(form)
}

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();
    let form = load(&args)?;

    if args.dump_params {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    let params = match form.to_record().validate() {
        Ok(params) => params,
        Err(violations) => {
            for v in &violations {
                eprintln!("  - {v}");
            }
            bail!("{} invalid parameter(s)", violations.len());
        }
    };
    for warning in params.warnings() {
        eprintln!("warning: {warning}; we no longer take responsibility for what happens");
    }

    let start = web_time::Instant::now();
    let model = generate(&params);
    let text = model.render();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let path = script_io::save_script_in(&text, &args.output_dir, &form.script_file_name())
        .map_err(|e| anyhow!(e))?;
    println!(
        "{}: {} pixels in {} ring(s), {} regions, {:.1}ms",
        path.display(),
        form.pixel_count,
        rings_needed(form.pixel_count),
        model.region_count(),
        elapsed_ms
    );

    if let Some(png) = &args.layout_png {
        let img = layout_image::render_layout(&model, args.layout_size);
        let png = args.output_dir.join(png);
        layout_image::save_image(&img, &png).map_err(|e| anyhow!(e))?;
        println!("{}: layout preview", png.display());
    }

    Ok(())
}
