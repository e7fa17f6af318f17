//! Command-line overrides for the configuration.

use std::path::PathBuf;

use boxel_atlas::DensityTier;
use boxel_rig::RotationOrder;
use clap::{Args, ValueEnum};

use crate::Config;

/// Density flag values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DensityArg {
    /// One texel per unit.
    #[value(name = "1")]
    X1,
    /// Two texels per unit.
    #[value(name = "2")]
    X2,
    /// Four texels per unit.
    #[value(name = "4")]
    X4,
}

impl From<DensityArg> for DensityTier {
    fn from(arg: DensityArg) -> Self {
        match arg {
            DensityArg::X1 => DensityTier::X1,
            DensityArg::X2 => DensityTier::X2,
            DensityArg::X4 => DensityTier::X4,
        }
    }
}

/// Rotation order flag values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RotationOrderArg {
    /// `Rx · Ry · Rz`.
    Xyz,
    /// `Rx · Rz · Ry`.
    Xzy,
    /// `Ry · Rx · Rz`.
    Yxz,
    /// `Ry · Rz · Rx`.
    Yzx,
    /// `Rz · Rx · Ry`.
    Zxy,
    /// `Rz · Ry · Rx`.
    Zyx,
}

impl From<RotationOrderArg> for RotationOrder {
    fn from(arg: RotationOrderArg) -> Self {
        match arg {
            RotationOrderArg::Xyz => RotationOrder::Xyz,
            RotationOrderArg::Xzy => RotationOrder::Xzy,
            RotationOrderArg::Yxz => RotationOrder::Yxz,
            RotationOrderArg::Yzx => RotationOrder::Yzx,
            RotationOrderArg::Zxy => RotationOrder::Zxy,
            RotationOrderArg::Zyx => RotationOrder::Zyx,
        }
    }
}

/// Global flags shared by every subcommand.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default)]
pub struct CliArgs {
    /// Texel density tier.
    #[arg(long, global = true)]
    pub density: Option<DensityArg>,

    /// Pixels between packed footprints.
    #[arg(long, global = true)]
    pub padding: Option<u32>,

    /// Smallest atlas side (power of two).
    #[arg(long, global = true)]
    pub min_atlas_size: Option<u32>,

    /// Euler composition order.
    #[arg(long, global = true)]
    pub rotation_order: Option<RotationOrderArg>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(density) = args.density {
            self.atlas.density = density.into();
        }
        if let Some(padding) = args.padding {
            self.atlas.padding = padding;
        }
        if let Some(size) = args.min_atlas_size {
            self.atlas.min_size = size;
        }
        if let Some(order) = args.rotation_order {
            self.rig.rotation_order = order.into();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
