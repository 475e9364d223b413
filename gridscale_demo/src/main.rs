// Copyright 2025 the Gridscale Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line demo for `gridscale_format` and `gridscale_scale`.

use clap::{Parser, Subcommand, ValueEnum};
use gridscale_format::{
    ConvertOptions, convert_units, duration_single_unit, duration_ymd_hms, mem_to_str,
    str_to_mem, time_unit_to_seconds, uptime, weeks_days_hms,
};
use gridscale_scale::{AxisBound, AxisSpec, RowRange};
use kurbo::Rect;

/// Plot area used to place the ticks of the `axis` command.
const PLOT_WIDTH: f64 = 600.0;

#[derive(Parser, Debug)]
#[command(name = "gridscale")]
#[command(about = "Format monitoring values and solve graph axes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a value with units into display text
    Convert(ConvertArgs),
    /// Solve a vertical axis for a data range
    Axis(AxisArgs),
    /// Format a duration given in seconds (or with a time suffix like `90m`)
    Duration(DurationArgs),
    /// Convert a memory size between `128M` and byte counts
    Mem {
        /// Size like `128M`, or a plain byte count
        size: String,
    },
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Value to convert
    #[arg(allow_hyphen_values = true)]
    value: String,

    /// Units of the value (`B`, `bps`, `s`, `uptime`, `unixtime`, ...)
    #[arg(default_value = "")]
    units: String,

    /// Fixed magnitude prefix power
    #[arg(long)]
    power: Option<u8>,

    /// Magnitude base (1000 or 1024)
    #[arg(long)]
    base: Option<u32>,

    /// Significant digits
    #[arg(long)]
    precision: Option<u32>,

    /// Decimals
    #[arg(long)]
    decimals: Option<u32>,

    /// Show exactly `--decimals` decimals
    #[arg(long)]
    exact: bool,

    /// Fold milliseconds into seconds for durations
    #[arg(long)]
    ignore_ms: bool,
}

#[derive(clap::Args, Debug)]
struct AxisArgs {
    /// Smallest data value
    #[arg(allow_hyphen_values = true)]
    min: f64,

    /// Largest data value
    #[arg(allow_hyphen_values = true)]
    max: f64,

    /// Units of the values
    #[arg(long, default_value = "")]
    units: String,

    /// Plot height in pixels
    #[arg(long, default_value_t = 200.0)]
    height: f64,

    /// Minimum row height in pixels
    #[arg(long, default_value_t = 30.0)]
    cell: f64,

    /// Fixed lower bound
    #[arg(long, allow_hyphen_values = true)]
    fixed_min: Option<f64>,

    /// Fixed upper bound
    #[arg(long, allow_hyphen_values = true)]
    fixed_max: Option<f64>,

    /// Include zero, as stacked graphs do
    #[arg(long)]
    stacked: bool,

    /// Character budget of a label
    #[arg(long, default_value_t = gridscale_scale::DEFAULT_PRECISION_MAX)]
    precision_max: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DurationStyle {
    /// `1d 1h 1m`
    Calendar,
    /// `1w 2d 3h`
    Weeks,
    /// `1 day, 01:01:01`
    Uptime,
    /// `1.04d`
    Single,
}

#[derive(clap::Args, Debug)]
struct DurationArgs {
    /// Seconds, optionally with a `s`, `m`, `h`, `d`, `w`, `M` or `y` suffix
    #[arg(allow_hyphen_values = true)]
    value: String,

    /// Output style
    #[arg(long, value_enum, default_value_t = DurationStyle::Calendar)]
    style: DurationStyle,

    /// Fold milliseconds into seconds
    #[arg(long)]
    ignore_ms: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => run_convert(&args),
        Command::Axis(args) => run_axis(&args)?,
        Command::Duration(args) => run_duration(&args)?,
        Command::Mem { size } => run_mem(&size)?,
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_convert(args: &ConvertArgs) {
    let mut options = ConvertOptions::new()
        .with_ignore_milliseconds(args.ignore_ms)
        .with_decimals_exact(args.exact);
    if let Some(power) = args.power {
        options = options.with_power(power);
    }
    if let Some(base) = args.base {
        options = options.with_unit_base(base);
    }
    if let Some(precision) = args.precision {
        options = options.with_precision(precision);
    }
    if let Some(decimals) = args.decimals {
        options = options.with_decimals(decimals);
    }

    let converted = convert_units(&args.value, &args.units, &options);
    if !converted.is_numeric {
        tracing::info!(units = %args.units, "rendered as text");
    }
    println!("{converted}");
}

fn run_axis(args: &AxisArgs) -> Result<(), Box<dyn std::error::Error>> {
    let plot = Rect::new(0.0, 0.0, PLOT_WIDTH, args.height);
    let rows = RowRange::for_plot(plot, args.cell);

    let mut spec = AxisSpec::new(args.units.as_str())
        .with_rows(rows)
        .with_stacked(args.stacked)
        .with_precision_max(args.precision_max);
    if let Some(min) = args.fixed_min {
        spec = spec.with_min(AxisBound::Fixed(min));
    }
    if let Some(max) = args.fixed_max {
        spec = spec.with_max(AxisBound::Fixed(max));
    }

    let axis = spec.solve(Some(args.min), Some(args.max))?;
    tracing::info!(
        rows_min = rows.min,
        rows_max = rows.max,
        rows = axis.scale.rows,
        interval = axis.scale.interval,
        "solved axis"
    );

    println!(
        "min {} max {} interval {} rows {}",
        axis.scale.min, axis.scale.max, axis.scale.interval, axis.scale.rows
    );
    for tick in axis.ticks.iter().rev() {
        println!("{:>8.1}px  {}", tick.y_in(plot), tick.label);
    }
    Ok(())
}

fn run_duration(args: &DurationArgs) -> Result<(), Box<dyn std::error::Error>> {
    let seconds = match args.value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => seconds,
        _ => {
            let seconds = time_unit_to_seconds(&args.value, true)
                .ok_or_else(|| format!("not a duration: {}", args.value))?;
            #[allow(clippy::cast_precision_loss, reason = "display only")]
            {
                seconds as f64
            }
        }
    };

    let text = match args.style {
        DurationStyle::Calendar => duration_ymd_hms(seconds, args.ignore_ms),
        DurationStyle::Weeks => {
            #[allow(clippy::cast_possible_truncation, reason = "whole seconds, saturating")]
            let whole = seconds.round() as i64;
            weeks_days_hms(whole)
        }
        DurationStyle::Uptime => uptime(seconds),
        DurationStyle::Single => duration_single_unit(seconds, args.ignore_ms, 2, false),
    };
    println!("{text}");
    Ok(())
}

fn run_mem(size: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(bytes) = size.parse::<u64>() {
        println!("{}", mem_to_str(bytes));
        return Ok(());
    }
    let bytes = str_to_mem(size).ok_or_else(|| format!("not a memory size: {size}"))?;
    println!("{bytes}");
    Ok(())
}
