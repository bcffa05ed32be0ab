use std::path::PathBuf;

use common::{
    chart::{ChartModel, Panel},
    config::Config,
};
use eyre::{Result, bail};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::{debug, info};

mod figure;

pub use figure::{Figure, OutputFormat};

// Font sizes in points, scaled by dpi / 72
const TITLE_PT: f64 = 14.0;
const AXIS_LABEL_PT: f64 = 12.0;
const TICK_LABEL_PT: f64 = 10.0;
const LEGEND_PT: f64 = 9.0;
const VALUE_LABEL_PT: f64 = 5.0;
const BAR_ALPHA: f64 = 0.8;

/// Pixel geometry of the output image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureStyle {
    pub size_px: (u32, u32),
    scale: f64,
}

impl FigureStyle {
    pub fn from_config(config: &Config) -> Self {
        let dpi = config.dpi as f64;
        let (width, height) = config.figure_size;
        Self {
            size_px: (
                (width * dpi).round().max(1.0) as u32,
                (height * dpi).round().max(1.0) as u32,
            ),
            scale: dpi / 72.0,
        }
    }

    pub fn font(&self, points: f64) -> u32 {
        (points * self.scale).round().max(1.0) as u32
    }

    pub fn px(&self, points: f64) -> u32 {
        (points * self.scale).round() as u32
    }
}

/// Draws the chart to `{root_path}/{output_filename}`.
/// Nothing is written at the output path unless the whole figure succeeds.
pub fn render(model: &ChartModel, config: &Config) -> Result<PathBuf> {
    if model.panels.is_empty() {
        bail!("Chart {} has no panels", model.name);
    }
    let style = FigureStyle::from_config(config);
    let figure = Figure::open(&config.output_path())?;
    debug!(
        "Rendering {} panels at {}x{} px",
        model.panels.len(),
        style.size_px.0,
        style.size_px.1
    );

    match figure.format() {
        OutputFormat::Svg => draw(
            SVGBackend::new(figure.staging_path(), style.size_px).into_drawing_area(),
            model,
            &style,
        )?,
        OutputFormat::Bitmap => draw(
            BitMapBackend::new(figure.staging_path(), style.size_px).into_drawing_area(),
            model,
            &style,
        )?,
    }

    let path = figure.save()?;
    info!("Wrote {}", path.display());
    Ok(path)
}

pub fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    model: &ChartModel,
    style: &FigureStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let areas = root.split_evenly((model.rows, model.columns));
    for (panel, area) in model.panels.iter().zip(&areas) {
        let first_column = panel.group == 0;
        draw_panel(area, panel, model, style, first_column)?;
    }
    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    model: &ChartModel,
    style: &FigureStyle,
    first_column: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (y_min, y_max) = model.y_range;
    let (x_min, x_max) = panel.x_range;
    let center = panel.center;
    let size_label = panel.size.to_string();
    // only powers of ten get a label once the axis spans a few decades
    let sparse_ticks = y_max / y_min > 100.0;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", style.font(TITLE_PT)))
        .margin(style.px(8.0))
        .x_label_area_size(style.px(40.0))
        .y_label_area_size(style.px(60.0))
        .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())?;

    let y_formatter = |y: &f64| format_log_tick(*y, sparse_ticks);

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .x_labels(0)
        .y_labels(10)
        .y_label_formatter(&y_formatter)
        .x_desc(&model.x_label)
        .label_style(("sans-serif", style.font(TICK_LABEL_PT)))
        .axis_desc_style(("sans-serif", style.font(AXIS_LABEL_PT)));
    if first_column {
        mesh.y_desc(&model.y_label);
    }
    mesh.draw()?;

    // the only x tick sits at the group centre, just under the axis
    let (tick_x, axis_y) = chart.backend_coord(&(center, y_min));
    let (base_x, base_y) = area.get_base_pixel();
    area.draw(&Text::new(
        size_label,
        (tick_x - base_x, axis_y - base_y + style.px(4.0) as i32),
        ("sans-serif", style.font(TICK_LABEL_PT))
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;

    let half = model.bar_width / 2.0;
    let swatch = style.px(5.0) as i32;
    for (idx, bar) in panel.bars.iter().enumerate() {
        let color = Palette99::pick(idx).mix(BAR_ALPHA);
        let bar_shapes = if bar.is_renderable() {
            let corners = [(bar.x - half, y_min), (bar.x + half, bar.height)];
            vec![
                Rectangle::new(corners, color.filled()),
                Rectangle::new(corners, BLACK.stroke_width(1)),
            ]
        } else {
            Vec::new()
        };
        chart
            .draw_series(bar_shapes)?
            .label(&bar.legend)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - swatch), (x + 2 * swatch, y + swatch)], color.filled())
            });

        if bar.is_renderable() {
            chart.draw_series(std::iter::once(Text::new(
                bar.label.clone(),
                (bar.x, bar.height),
                ("sans-serif", style.font(VALUE_LABEL_PT))
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", style.font(LEGEND_PT)))
        .draw()?;
    Ok(())
}

fn format_log_tick(value: f64, sparse: bool) -> String {
    if value <= 0.0 {
        return String::new();
    }
    let exponent = value.log10();
    if sparse && (exponent - exponent.round()).abs() > 1e-6 {
        return String::new();
    }
    if value >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
