use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub const DEFAULT_SHADER_PATH: &str = "res/shaders/Basic.shader";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub shader_path: PathBuf,
    /// Frames to wait per buffer swap; 0 disables vsync.
    pub swap_interval: u32,
    /// How far the red channel moves each frame.
    pub color_step: f32,
    pub break_on_gl_error: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Hello World".to_string(),
            width: 640,
            height: 480,
            shader_path: PathBuf::from(DEFAULT_SHADER_PATH),
            swap_interval: 1,
            color_step: 0.05,
            break_on_gl_error: false,
        }
    }
}

fn parse_color_step(value: &str) -> Result<f32, String> {
    let step: f32 = value.parse().map_err(|err| format!("{err}"))?;
    if !step.is_finite() || step <= 0.0 {
        return Err(format!("expected a finite number above zero, got {value}"));
    }
    Ok(step)
}

fn command() -> Command {
    Command::new("glquad")
        .about("Draws a colour-cycling quad with OpenGL")
        .arg(
            Arg::new("shader")
                .long("shader")
                .value_name("PATH")
                .help("Shader file with `#shader vertex` and `#shader fragment` sections")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .help("Window title"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .help("Window width in logical pixels")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Window height in logical pixels")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("swap-interval")
                .long("swap-interval")
                .help("Frames to wait per buffer swap (0 disables vsync)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("color-step")
                .long("color-step")
                .help("Change of the red channel per frame")
                .value_parser(parse_color_step),
        )
        .arg(
            Arg::new("break-on-gl-error")
                .long("break-on-gl-error")
                .help("Panic on the first OpenGL error instead of shutting down")
                .action(ArgAction::SetTrue),
        )
}

impl AppConfig {
    /// Builds a config from command line arguments; the first item is the
    /// program name.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        let mut config = AppConfig::default();

        if let Some(path) = matches.get_one::<PathBuf>("shader") {
            config.shader_path = path.clone();
        }
        if let Some(title) = matches.get_one::<String>("title") {
            config.title = title.clone();
        }
        if let Some(&width) = matches.get_one::<u32>("width") {
            config.width = width;
        }
        if let Some(&height) = matches.get_one::<u32>("height") {
            config.height = height;
        }
        if let Some(&interval) = matches.get_one::<u32>("swap-interval") {
            config.swap_interval = interval;
        }
        if let Some(&step) = matches.get_one::<f32>("color-step") {
            config.color_step = step;
        }
        config.break_on_gl_error = matches.get_flag("break-on-gl-error");

        Ok(config)
    }
}
