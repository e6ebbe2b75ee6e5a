//!
//! # Command-Line Generation
//! The core logic of the `xbar21` binary.
//!

// Std-Lib
use std::error::Error;
use std::path::{Path, PathBuf};

// Workspace
use xbar21raw::gds::{Exporter, GdsExporter};
use xbar21raw::svg::{RenderOptions, Renderer, SvgRenderer};
use xbar21raw::LayoutError;
use xbar21utils::{EnumStr, SerdeFile};

// Local imports
use crate::{DiodeArray, DiodeArrayParams, PadStyle};

/// # Generation Options
///
/// The binary's `ProgramOptions`, without the `clap` annotations.
///
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Parameter file, in JSON, YAML, or TOML
    pub config: Option<String>,
    /// Output directory
    pub outdir: String,
    /// Override of the top-level cell and file name
    pub name: Option<String>,
    /// Override of the pad style
    pub style: Option<String>,
    /// Invert the back stack, regardless of the parameter file
    pub invert: bool,
    /// SVG preview file
    pub svg: Option<String>,
    pub show_ports: bool,
    pub show_subports: bool,
    /// Print the parameter schema and exit
    pub schema: bool,
}

/// Load parameters per `options`, applying its overrides
pub fn load_params(options: &GenerateOptions) -> Result<DiodeArrayParams, Box<dyn Error>> {
    let config = match &options.config {
        Some(c) => c,
        None => return Err(LayoutError::config("config", "No parameter file given").into()),
    };
    let mut params = <DiodeArrayParams as SerdeFile>::open_any(config)?;
    if let Some(name) = &options.name {
        params.name = name.clone();
    }
    if let Some(style) = &options.style {
        params.pad_style = parse_style(style)?;
    }
    if options.invert {
        params.invert_back = true;
    }
    Ok(params)
}

/// Parse a pad-style name or alias
pub fn parse_style(s: &str) -> Result<PadStyle, LayoutError> {
    <PadStyle as EnumStr>::from_str(s).ok_or_else(|| {
        LayoutError::config(
            "pad_style",
            format!(
                "Unknown pad style `{}`, expected one of {:?}",
                s,
                <PadStyle as EnumStr>::accepted()
            ),
        )
    })
}

/// Core implementation: load parameters, generate, and write the mask.
/// Returns the path of the written GDSII file, or `None` if only the schema was requested.
pub fn generate(options: &GenerateOptions) -> Result<Option<PathBuf>, Box<dyn Error>> {
    if options.schema {
        println!("{}", DiodeArrayParams::schema()?);
        return Ok(None);
    }
    let params = load_params(options)?;
    let generator = DiodeArray::new(params)?;
    let layout = generator.generate()?;

    let name = &generator.params().name;
    let gds = GdsExporter.export(&layout.canvas, Path::new(&options.outdir), name)?;

    if let Some(svg) = &options.svg {
        let opts = RenderOptions {
            show_ports: options.show_ports,
            show_subports: options.show_subports,
        };
        SvgRenderer::new(svg).render(&layout.canvas, &opts)?;
    }
    Ok(Some(gds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar21utils::SerializationFormat;

    fn setup() -> Result<(tempfile::TempDir, GenerateOptions), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config = dir.path().join("params.yaml");
        DiodeArrayParams::default().save(SerializationFormat::Yaml, &config)?;
        let options = GenerateOptions {
            config: Some(config.to_string_lossy().into()),
            outdir: dir.path().join("out").to_string_lossy().into(),
            ..Default::default()
        };
        Ok((dir, options))
    }

    #[test]
    fn writes_gds_and_svg() -> Result<(), Box<dyn Error>> {
        let (dir, mut options) = setup()?;
        let svg = dir.path().join("preview.svg");
        options.svg = Some(svg.to_string_lossy().into());
        options.show_ports = true;
        let gds = generate(&options)?.ok_or("no output")?;
        assert_eq!(gds, dir.path().join("out").join("diode_array.gds"));
        assert!(gds.exists());
        let preview = std::fs::read_to_string(svg)?;
        assert!(preview.starts_with("<?xml"));
        Ok(())
    }
    #[test]
    fn overrides() -> Result<(), Box<dyn Error>> {
        let (_dir, mut options) = setup()?;
        options.name = Some("xb".into());
        options.style = Some("interleaved".into());
        options.invert = true;
        let params = load_params(&options)?;
        assert_eq!(params.name, "xb");
        assert_eq!(params.pad_style, PadStyle::Staggered);
        assert!(params.invert_back);

        let gds = generate(&options)?.ok_or("no output")?;
        assert!(gds.ends_with("xb.gds"));
        Ok(())
    }
    #[test]
    fn bad_style() -> Result<(), Box<dyn Error>> {
        let (_dir, mut options) = setup()?;
        options.style = Some("triple".into());
        let err = generate(&options).err().ok_or("expected an error")?;
        assert!(err.to_string().contains("half_density"));
        Ok(())
    }
    #[test]
    fn schema_only() -> Result<(), Box<dyn Error>> {
        let options = GenerateOptions {
            schema: true,
            ..Default::default()
        };
        assert!(generate(&options)?.is_none());
        Ok(())
    }
    #[test]
    fn missing_config() {
        assert!(load_params(&GenerateOptions::default()).is_err());
    }
}
