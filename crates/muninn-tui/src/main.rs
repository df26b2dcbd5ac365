mod app;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use muninn_ingest::{resolve_data_root, StorePaths};

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Optional positional data root, else MUNINN_DATA_DIR / platform default.
    let override_dir = std::env::args().nth(1).map(PathBuf::from);
    let root = resolve_data_root(override_dir.as_deref());
    let paths = StorePaths::discover(root);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, paths);
    ratatui::restore();

    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, paths: StorePaths) -> color_eyre::Result<()> {
    let mut app = App::new(paths);
    let interval = Duration::from_secs(2);
    let mut last_refresh = Instant::now();

    app.refresh();

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= interval {
            app.refresh();
            last_refresh = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
