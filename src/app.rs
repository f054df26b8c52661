use starchart::braille::BrailleSink;
use starchart::map::ATLAS_MAP_COUNT;
use starchart::{ChartConfig, ChartLayout, ChartRenderer, ChartResult, LayerKind, MapSelection, SkyCatalog};
use tracing::info;

/// Application state
pub struct App {
    pub config: ChartConfig,
    pub catalog: SkyCatalog,
    pub selection: MapSelection,
    pub renderer: ChartRenderer,
    pub should_quit: bool,
    /// Terminal size in cells
    pub width: usize,
    pub height: usize,
}

impl App {
    pub fn new(config: ChartConfig, catalog: SkyCatalog, width: usize, height: usize) -> ChartResult<Self> {
        let selection = config.selection.clone();
        let layout = ChartLayout::new(&selection, config.sizing)?;
        let renderer = ChartRenderer::new(layout, config.settings.clone());
        Ok(Self {
            config,
            catalog,
            selection,
            renderer,
            should_quit: false,
            width,
            height,
        })
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Chart area in cells: the border takes two columns, the border and the
    /// status bar three rows
    pub fn chart_size(&self) -> (usize, usize) {
        (self.width.saturating_sub(2), self.height.saturating_sub(3))
    }

    fn select(&mut self, selection: MapSelection) -> ChartResult<()> {
        let layout = ChartLayout::new(&selection, self.config.sizing)?;
        info!(chart = %layout.label, "chart selected");
        self.renderer.layout = layout;
        self.selection = selection;
        Ok(())
    }

    fn step_map(&mut self, delta: i64) -> ChartResult<()> {
        let count = ATLAS_MAP_COUNT as i64;
        let next = match self.selection {
            MapSelection::Atlas(index) => (index - 1 + delta).rem_euclid(count) + 1,
            MapSelection::Corners { .. } if delta > 0 => 1,
            MapSelection::Corners { .. } => count,
        };
        self.select(MapSelection::Atlas(next))
    }

    pub fn next_map(&mut self) -> ChartResult<()> {
        self.step_map(1)
    }

    pub fn prev_map(&mut self) -> ChartResult<()> {
        self.step_map(-1)
    }

    pub fn toggle(&mut self, kind: LayerKind) {
        self.renderer.settings.toggle_layer(kind);
    }

    /// Messier, generic and Herschel objects switch together
    pub fn toggle_deep_sky(&mut self) {
        let settings = &mut self.renderer.settings;
        let on = !(settings.show_messier || settings.show_dsos || settings.show_herschel);
        for kind in [LayerKind::Messier, LayerKind::DeepSky, LayerKind::Herschel] {
            settings.set_layer(kind, on);
        }
    }

    pub fn toggle_markers(&mut self) {
        self.renderer.settings.toggle_markers();
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Rasterize the current chart for a `cols x rows` cell area
    pub fn rasterize(&self, cols: usize, rows: usize) -> BrailleSink {
        let mut sink = BrailleSink::new(&self.renderer.layout.viewport, cols, rows);
        self.renderer.render(&self.catalog, &mut sink);
        sink
    }

    /// Chart centre as a string
    pub fn center_coords(&self) -> String {
        let frame = &self.renderer.layout.frame;
        let ra_h = frame.ra0.to_degrees().rem_euclid(360.0) / 15.0;
        let total_min = (ra_h * 60.0).round() as i64;
        let dec = frame.dec0.to_degrees();
        format!(
            "RA {:02}h{:02}m Dec {}{:.0}°",
            (total_min / 60) % 24,
            total_min % 60,
            if dec >= 0.0 { "+" } else { "-" },
            dec.abs()
        )
    }

    pub fn scale_text(&self) -> String {
        format!("{:.0} pt/rad", self.renderer.layout.frame.scale)
    }
}
