use std::io;
use std::path::PathBuf;

use anyhow::Result;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use pipesh::config::{Config, ConfigLoader};
use pipesh::executor::Interpreter;
use pipesh::platform::UnixPlatform;
use pipesh::repl;

fn main() -> Result<()> {
    let config = load_config();
    TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )?;
    let mut interpreter = Interpreter::new(UnixPlatform::new());
    repl::run(io::stdin().lock(), &mut interpreter, &config)
}

fn load_config() -> Config {
    let Some(home) = std::env::var_os("HOME") else {
        return ConfigLoader::default_config();
    };
    let path = PathBuf::from(home).join(".pipeshrc");
    if !path.exists() {
        return ConfigLoader::default_config();
    }
    match ConfigLoader::load_from_file(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("pipesh: {err}");
            ConfigLoader::default_config()
        }
    }
}
