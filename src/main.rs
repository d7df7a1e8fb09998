mod app;
mod calendar;
mod config;
mod errors;
mod free_time;
mod input;
mod models;
mod storage;
mod store;
mod ui;

use std::io::{self, BufRead, Write};

use log::info;

use app::App;
use config::Config;
use input::parse_command;

fn main() -> io::Result<()> {
    env_logger::init();

    let config = Config::load();
    info!("using save file {}", config.data.save_file.display());
    let mut app = App::new(&config);

    println!("Welcome to caltrack!");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        app.render();
        println!("Enter help to see the available commands.");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if let Err(e) = app.handle(command) {
                    println!("{e}");
                }
            }
            Err(e) => println!("{e}"),
        }
        if app.should_quit {
            break;
        }
    }
    println!("Goodbye!");
    Ok(())
}
