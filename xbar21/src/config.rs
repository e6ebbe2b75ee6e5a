//!
//! # Diode-Array Parameters
//!
//! Loaded from JSON, YAML, or TOML, as chosen by file extension.
//! Every check runs in [DiodeArrayParams::validate], before any geometry is built.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Workspace
use xbar21raw::{LayoutError, LayoutResult};
use xbar21utils::{enumstr, SerdeFile};

enumstr!(
    /// # Pad-Layout Strategy
    ///
    /// Older parameter files name these `double`, `single`, `interleaved`, and `single_line`.
    ///
    PadStyle {
        Grid: "grid" | "double",
        HalfDensity: "half_density" | "single",
        Staggered: "staggered" | "interleaved",
        SingleEdge: "single_edge" | "single_line",
    }
);

/// The two bar axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Vertical bars, on the back stack. Their pads sit on the bottom and top sides.
    Vertical,
    /// Horizontal bars, on the front stack. Their pads sit on the left and right sides.
    Horizontal,
}
impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 1,
        }
    }
}

fn default_name() -> String {
    "diode_array".into()
}

/// # Diode-Array Generator Parameters
///
/// Lengths are in microns, angles in degrees.
/// Two-entry arrays are ordered `[vertical, horizontal]`.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DiodeArrayParams {
    /// Top-level cell and output file base name
    #[serde(default = "default_name")]
    pub name: String,
    /// Inner pad width, inner pad height, and the outer contact's margin around it
    pub pad_dimensions: [f64; 3],
    /// Pad center-to-center pitch
    pub pad_pitch: f64,
    pub bar_width: f64,
    /// Bar center-to-center pitch
    pub bar_pitch: f64,
    /// Number of vertical and horizontal bars
    pub num_bars: [usize; 2],
    /// Diode contact radius
    pub circle_radius: f64,
    /// Clearance from the bar field's edge to each pad row
    pub bar_pad_spacing: [f64; 2],
    /// Minimum straight stub leaving each pad
    pub pad_route_dist: f64,
    /// Exit angle of each axis's traces, each in (0, 90)
    pub route_thetas: [f64; 2],
    #[schemars(with = "String")]
    pub pad_style: PadStyle,
    /// Extra gap between staggered sub-rows
    #[serde(default, alias = "interleaved_pad_spacing")]
    pub stagger_gap: f64,
    /// Lateral shift of the staggered rows. Defaults to a quarter pad pitch.
    #[serde(default)]
    pub stagger_shift: Option<f64>,
    /// Label text height
    pub text_size: f64,
    /// Emit the back stack as a negative (clear-field) pattern
    #[serde(default, alias = "invert_be")]
    pub invert_back: bool,
    /// Half-density row offsets, ordered `[bottom, top, left, right]`
    #[serde(default)]
    pub pad_offsets: [f64; 4],
}
impl SerdeFile for DiodeArrayParams {}

impl Default for DiodeArrayParams {
    fn default() -> Self {
        Self {
            name: default_name(),
            pad_dimensions: [100., 150., 10.],
            pad_pitch: 200.,
            bar_width: 10.,
            bar_pitch: 100.,
            num_bars: [3, 2],
            circle_radius: 3.,
            bar_pad_spacing: [400., 400.],
            pad_route_dist: 50.,
            route_thetas: [45., 45.],
            pad_style: PadStyle::Grid,
            stagger_gap: 0.,
            stagger_shift: None,
            text_size: 40.,
            invert_back: false,
            pad_offsets: [0.; 4],
        }
    }
}

impl DiodeArrayParams {
    /// Load from file `fname`, and validate
    pub fn open(fname: impl AsRef<Path>) -> LayoutResult<Self> {
        let params = <Self as SerdeFile>::open_any(fname)?;
        params.validate()?;
        Ok(params)
    }
    /// JSON schema of the parameter files
    pub fn schema() -> LayoutResult<String> {
        let schema = schemars::schema_for!(DiodeArrayParams);
        serde_json::to_string_pretty(&schema).map_err(|e| LayoutError::Boxed(Box::new(e)))
    }
    /// Reject anything which cannot produce a layout
    pub fn validate(&self) -> LayoutResult<()> {
        let [w, h, m] = self.pad_dimensions;
        let finite = [
            ("pad_dimensions", w),
            ("pad_dimensions", h),
            ("pad_dimensions", m),
            ("pad_pitch", self.pad_pitch),
            ("bar_width", self.bar_width),
            ("bar_pitch", self.bar_pitch),
            ("circle_radius", self.circle_radius),
            ("bar_pad_spacing", self.bar_pad_spacing[0]),
            ("bar_pad_spacing", self.bar_pad_spacing[1]),
            ("pad_route_dist", self.pad_route_dist),
            ("route_thetas", self.route_thetas[0]),
            ("route_thetas", self.route_thetas[1]),
            ("stagger_gap", self.stagger_gap),
            ("stagger_shift", self.stagger_shift()),
            ("text_size", self.text_size),
        ];
        for (param, val) in finite.iter() {
            check(param, val.is_finite(), format!("must be finite, got {}", val))?;
        }
        for (param, val) in self.pad_offsets.iter().map(|v| ("pad_offsets", *v)) {
            check(param, val.is_finite(), format!("must be finite, got {}", val))?;
        }
        check("name", !self.name.is_empty(), "must not be empty")?;
        check(
            "pad_dimensions",
            w > 0. && h > 0. && m >= 0.,
            "pad sizes must be positive, and the margin non-negative",
        )?;
        check(
            "pad_pitch",
            self.pad_pitch >= w + 2. * m,
            format!(
                "must fit the outer pad width {}, got {}",
                w + 2. * m,
                self.pad_pitch
            ),
        )?;
        check("bar_width", self.bar_width > 0., "must be positive")?;
        check(
            "bar_pitch",
            self.bar_pitch >= self.bar_width,
            "must be at least the bar width",
        )?;
        check(
            "num_bars",
            self.num_bars.iter().all(|n| *n > 0),
            "each axis needs at least one bar",
        )?;
        check("circle_radius", self.circle_radius > 0., "must be positive")?;
        check(
            "bar_pad_spacing",
            self.bar_pad_spacing.iter().all(|s| *s >= 0.),
            "must be non-negative",
        )?;
        check("pad_route_dist", self.pad_route_dist >= 0., "must be non-negative")?;
        check(
            "route_thetas",
            self.route_thetas.iter().all(|t| *t > 0. && *t < 90.),
            format!(
                "exit angles must lie in (0, 90) degrees, got {:?}",
                self.route_thetas
            ),
        )?;
        check("stagger_gap", self.stagger_gap >= 0., "must be non-negative")?;
        check("text_size", self.text_size > 0., "must be positive")?;
        Ok(())
    }
    /// Inner pad width
    pub fn pad_w(&self) -> f64 {
        self.pad_dimensions[0]
    }
    /// Inner pad height
    pub fn pad_h(&self) -> f64 {
        self.pad_dimensions[1]
    }
    /// Outer contact margin
    pub fn pad_margin(&self) -> f64 {
        self.pad_dimensions[2]
    }
    pub fn num(&self, axis: Axis) -> usize {
        self.num_bars[axis.index()]
    }
    /// Bar length along each axis, `(count − 1)·pitch + width`.
    /// Vertical bars span the horizontal-bar count, and vice versa.
    pub fn bar_lengths(&self) -> [f64; 2] {
        let len = |n: usize| (n as f64 - 1.) * self.bar_pitch + self.bar_width;
        [len(self.num_bars[0]), len(self.num_bars[1])]
    }
    /// Exit angle for `axis`, in degrees
    pub fn theta(&self, axis: Axis) -> f64 {
        self.route_thetas[axis.index()]
    }
    pub fn stagger_shift(&self) -> f64 {
        self.stagger_shift.unwrap_or(self.pad_pitch / 4.)
    }
    /// Distance from the origin to the center of `axis`'s pad rows
    pub fn pad_row_offset(&self, axis: Axis) -> f64 {
        let field = match axis {
            // Vertical-bar pads sit beyond the vertical bars' ends
            Axis::Vertical => self.bar_lengths()[1],
            Axis::Horizontal => self.bar_lengths()[0],
        };
        field / 2. + self.bar_pad_spacing[axis.index()] + self.pad_h() / 2.
    }
}

fn check(param: &str, ok: bool, msg: impl Into<String>) -> LayoutResult<()> {
    match ok {
        true => Ok(()),
        false => Err(LayoutError::config(param, msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbar21utils::SerializationFormat;

    #[test]
    fn bar_lengths() {
        let params = DiodeArrayParams::default();
        assert_eq!(params.bar_lengths(), [210., 110.]);
        assert_eq!(params.stagger_shift(), 50.);
        assert_eq!(params.pad_row_offset(Axis::Vertical), 55. + 400. + 75.);
    }
    #[test]
    fn style_aliases() -> LayoutResult<()> {
        let fmt = SerializationFormat::Json;
        for (txt, style) in [
            ("\"grid\"", PadStyle::Grid),
            ("\"double\"", PadStyle::Grid),
            ("\"single\"", PadStyle::HalfDensity),
            ("\"interleaved\"", PadStyle::Staggered),
            ("\"single_line\"", PadStyle::SingleEdge),
        ] {
            assert_eq!(fmt.from_str::<PadStyle>(txt)?, style);
        }
        assert_eq!(PadStyle::SingleEdge.to_string(), "single_edge");
        Ok(())
    }
    #[test]
    fn invalid_style_rejected_at_parse() {
        let yaml = r#"
            pad_dimensions: [100, 150, 10]
            pad_pitch: 200
            bar_width: 10
            bar_pitch: 100
            num_bars: [3, 2]
            circle_radius: 3
            bar_pad_spacing: [400, 400]
            pad_route_dist: 50
            route_thetas: [45, 45]
            pad_style: zigzag
            text_size: 40
        "#;
        let res: Result<DiodeArrayParams, _> = SerializationFormat::Yaml.from_str(yaml);
        let err = res.unwrap_err().to_string();
        assert!(err.contains("zigzag"));
    }
    #[test]
    fn legacy_names() -> LayoutResult<()> {
        let yaml = r#"
            pad_dimensions: [100, 150, 10]
            pad_pitch: 200
            bar_width: 10
            bar_pitch: 100
            num_bars: [3, 2]
            circle_radius: 3
            bar_pad_spacing: [400, 400]
            pad_route_dist: 50
            route_thetas: [45, 45]
            pad_style: interleaved
            interleaved_pad_spacing: 30
            invert_be: true
            text_size: 40
        "#;
        let params: DiodeArrayParams = SerializationFormat::Yaml.from_str(yaml)?;
        assert_eq!(params.pad_style, PadStyle::Staggered);
        assert_eq!(params.stagger_gap, 30.);
        assert!(params.invert_back);
        assert_eq!(params.name, "diode_array");
        assert_eq!(params.pad_offsets, [0.; 4]);
        params.validate()
    }
    #[test]
    fn validation() {
        let ok = DiodeArrayParams::default();
        assert!(ok.validate().is_ok());

        let mut p = ok.clone();
        p.route_thetas = [0., 45.];
        assert!(matches!(
            p.validate(),
            Err(LayoutError::Config { ref param, .. }) if param == "route_thetas"
        ));
        let mut p = ok.clone();
        p.route_thetas = [45., 90.];
        assert!(p.validate().is_err());
        let mut p = ok.clone();
        p.num_bars = [0, 2];
        assert!(p.validate().is_err());
        let mut p = ok.clone();
        p.bar_width = f64::NAN;
        assert!(p.validate().is_err());
        let mut p = ok.clone();
        p.pad_pitch = 100.;
        assert!(p.validate().is_err());
    }
    #[test]
    fn file_round_trip() -> LayoutResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("params.toml");
        let mut params = DiodeArrayParams::default();
        params.pad_style = PadStyle::HalfDensity;
        params.save(SerializationFormat::Toml, &path)?;
        assert_eq!(DiodeArrayParams::open(&path)?, params);
        Ok(())
    }
    #[test]
    fn schema() -> LayoutResult<()> {
        let schema = DiodeArrayParams::schema()?;
        assert!(schema.contains("pad_dimensions"));
        assert!(schema.contains("route_thetas"));
        Ok(())
    }
}
