mod flickr;
mod logging;
mod sources;

use std::env;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use reqwest::blocking::Client;
use termphoto_render::{
    CellRenderer, FixedSurface, LayoutPolicy, PaletteMode, RenderOptions, ResampleFilter,
    Slideshow, SurfaceDimensions, SurfaceQuery, TerminalSurface, DEFAULT_CELL_ASPECT,
};

use flickr::FlickrClient;
use sources::{expand_input, FrameQueue};

#[derive(Parser, Debug)]
#[command(author, version, about = "Show photos as colored cells right in the terminal")]
struct Cli {
    /// Image URLs, files or directories to show
    #[arg(required_unless_present = "flickr")]
    inputs: Vec<String>,
    /// Flickr user id whose public photos are shown (e.g. 50566068@N00)
    #[arg(long, requires = "api_key")]
    flickr: Option<String>,
    /// Flickr API key
    #[arg(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Number of photos requested from Flickr
    #[arg(long, default_value_t = 100)]
    per_page: u16,
    /// Seconds between photos
    #[arg(long, default_value_t = 5)]
    wait: u64,
    /// Show photos in random order
    #[arg(long, default_value_t = false)]
    shuffle: bool,
    /// Render into a fixed WIDTHxHEIGHT cell grid instead of the terminal
    #[arg(long, value_parser = parse_size)]
    size: Option<SurfaceDimensions>,
    /// Terminal rows left free below each frame
    #[arg(long, default_value_t = 1)]
    reserve_rows: u16,
    /// Print more log messages (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Print fewer log messages (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Terminal palette used for cell colors
    #[arg(long, value_enum, default_value = "auto")]
    palette: PaletteChoice,
    /// Resampling filter used to shrink photos to the cell grid
    #[arg(long, value_enum, default_value = "nearest")]
    filter: FilterChoice,
    /// Keep the photo's aspect ratio instead of filling the terminal
    #[arg(long, default_value_t = false)]
    fit: bool,
    /// Cell aspect ratio (height / width) assumed by --fit
    #[arg(long, default_value_t = DEFAULT_CELL_ASPECT)]
    cell_aspect: f32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PaletteChoice {
    /// True color when COLORTERM advertises it, grayscale otherwise
    Auto,
    Grayscale,
    Color256,
    Truecolor,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(logging::level_filter(cli.verbose, cli.quiet))
        .context("failed to install logger")?;

    let http = Client::builder()
        .user_agent(concat!("termphoto/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP client")?;

    let mut queue = FrameQueue::new(http.clone());
    for input in &cli.inputs {
        queue.extend(expand_input(input));
    }

    // clap only accepts --flickr together with an API key.
    if let (Some(user_id), Some(api_key)) = (&cli.flickr, &cli.api_key) {
        match flickr_urls(http, api_key, user_id, cli.per_page) {
            Ok(urls) => urls.into_iter().for_each(|url| queue.push_url(url)),
            Err(err) => error!("{err:#}"),
        }
    }

    if queue.is_empty() {
        warn!("no photos to show");
        return Ok(());
    }
    if cli.shuffle {
        queue.shuffle();
    }

    let colorterm = env::var("COLORTERM").ok();
    let options = cli.settings.to_options(colorterm.as_deref());
    info!("showing {} photos with {:?}", queue.len(), options);

    let (surface, home_cursor): (Box<dyn SurfaceQuery>, bool) = match cli.size {
        Some(dimensions) => (Box::new(FixedSurface(dimensions)), false),
        None => (Box::new(TerminalSurface::new(cli.reserve_rows)), true),
    };
    let slideshow = Slideshow::new(CellRenderer::from_options(options), surface)
        .with_delay(Duration::from_secs(cli.wait))
        .with_home_cursor(home_cursor);

    let mut stdout = io::stdout().lock();
    let summary = slideshow.show(&mut queue, &mut stdout).context("failed to write frame")?;
    info!(
        "{} shown, {} failed to load, {} skipped for lack of space, {} failed to render",
        summary.rendered, summary.skipped_load, summary.skipped_surface, summary.skipped_render
    );

    Ok(())
}

fn flickr_urls(http: Client, api_key: &str, user_id: &str, per_page: u16) -> Result<Vec<String>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Searching flickr for {user_id}"));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let urls = FlickrClient::new(http, api_key).public_photo_urls(user_id, per_page);
    spinner.finish_and_clear();

    urls.with_context(|| format!("failed to list photos of {user_id}"))
}

fn parse_size(value: &str) -> Result<SurfaceDimensions, String> {
    let (width, height) = value
        .split_once(&['x', 'X'][..])
        .ok_or_else(|| format!("'{value}' is not WIDTHxHEIGHT"))?;
    let width: i64 = width.trim().parse().map_err(|_| format!("invalid width '{width}'"))?;
    let height: i64 = height.trim().parse().map_err(|_| format!("invalid height '{height}'"))?;
    SurfaceDimensions::from_signed(width, height).map_err(|err| err.to_string())
}

impl RenderSettings {
    fn to_options(&self, colorterm: Option<&str>) -> RenderOptions {
        let layout = if self.fit {
            LayoutPolicy::Fit { cell_aspect: self.cell_aspect.max(0.1) }
        } else {
            LayoutPolicy::Stretch
        };

        RenderOptions {
            palette: self.palette.to_mode().resolve(colorterm),
            filter: self.filter.to_filter(),
            layout,
        }
    }
}

impl PaletteChoice {
    fn to_mode(self) -> PaletteMode {
        match self {
            PaletteChoice::Auto => PaletteMode::Auto,
            PaletteChoice::Grayscale => PaletteMode::Grayscale,
            PaletteChoice::Color256 => PaletteMode::Color256,
            PaletteChoice::Truecolor => PaletteMode::TrueColor,
        }
    }
}

impl FilterChoice {
    fn to_filter(self) -> ResampleFilter {
        match self {
            FilterChoice::Nearest => ResampleFilter::Nearest,
            FilterChoice::Triangle => ResampleFilter::Triangle,
            FilterChoice::CatmullRom => ResampleFilter::CatmullRom,
            FilterChoice::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use termphoto_render::Palette;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sizes_parse() {
        assert_eq!(parse_size("80x24"), Ok(SurfaceDimensions::new(80, 24)));
        assert_eq!(parse_size("1X1"), Ok(SurfaceDimensions::new(1, 1)));
        assert_eq!(parse_size("0x0"), Ok(SurfaceDimensions::EMPTY));
    }

    #[test]
    fn bad_sizes_are_rejected() {
        assert!(parse_size("80").is_err());
        assert!(parse_size("axb").is_err());
        assert_eq!(parse_size("-3x4"), Err("invalid dimensions -3x4".to_owned()));
    }

    #[test]
    fn settings_map_to_render_options() {
        let cli = Cli::parse_from([
            "termphoto",
            "--palette",
            "color256",
            "--filter",
            "lanczos3",
            "--fit",
            "photo.jpg",
        ]);
        let options = cli.settings.to_options(Some("truecolor"));
        assert_eq!(options.palette, Palette::ColorCube);
        assert_eq!(options.filter, ResampleFilter::Lanczos3);
        assert_eq!(options.layout, LayoutPolicy::Fit { cell_aspect: DEFAULT_CELL_ASPECT });
        assert_eq!(cli.wait, 5);
    }
}
