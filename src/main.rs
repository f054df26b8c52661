mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use starchart::{builtin_sky, load_catalog, ChartConfig, ChartRenderer, LayerKind, OutputMode, SkyCatalog, SvgSink};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stderr, errors only unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(io::stderr)
        .init();

    let config = ChartConfig::from_env().context("reading STARCHART_* configuration")?;
    let catalog = load_sky(&config);

    match config.output {
        OutputMode::Svg => write_svg(&config, &catalog),
        OutputMode::Terminal => {
            let mut terminal = ratatui::init();
            terminal.clear()?;
            let result = run(&mut terminal, config, catalog);
            ratatui::restore();
            result
        }
    }
}

/// Catalog files from the data directory, or the built-in sky if none load
fn load_sky(config: &ChartConfig) -> SkyCatalog {
    let catalog = load_catalog(&config.data_dir);
    if catalog.is_empty() {
        warn!(dir = %config.data_dir.display(), "no catalog data found, using built-in sky");
        return builtin_sky();
    }
    catalog
}

fn write_svg(config: &ChartConfig, catalog: &SkyCatalog) -> Result<()> {
    let layout = starchart::ChartLayout::new(&config.selection, config.sizing)?;
    let mut sink = SvgSink::new(layout.viewport);
    let renderer = ChartRenderer::new(layout, config.settings.clone());
    renderer.render(catalog, &mut sink);
    info!(primitives = sink.emitted(), "svg written");

    let mut out = io::stdout().lock();
    svg::write(&mut out, &sink.finish()).context("writing svg to stdout")?;
    out.flush()?;
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, config: ChartConfig, catalog: SkyCatalog) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, catalog, size.width as usize, size.height as usize)?;

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // press only, not release
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            KeyCode::Char('n') | KeyCode::Right => app.next_map()?,
                            KeyCode::Char('p') | KeyCode::Left => app.prev_map()?,

                            // Layer toggles
                            KeyCode::Char('g') => app.toggle(LayerKind::Grid),
                            KeyCode::Char('m') => app.toggle(LayerKind::MilkyWay),
                            KeyCode::Char('s') => app.toggle(LayerKind::Stars),
                            KeyCode::Char('c') => app.toggle(LayerKind::ConstellationLines),
                            KeyCode::Char('b') => app.toggle(LayerKind::ConstellationBorders),
                            KeyCode::Char('d') => app.toggle_deep_sky(),
                            KeyCode::Char('x') => app.toggle_markers(),

                            _ => {}
                        }
                    }
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
