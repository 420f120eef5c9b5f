//! Launcher of the process group.

use pingpong::Launcher;

/// Accepts arguments from the command line:
/// `-n <N> [--host <HOST>] [--base-port <PORT>] <program> [args...]`
fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let launcher = match Launcher::from_args(std::env::args_os().skip(1)) {
        Ok(launcher) => launcher,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    match launcher.run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}
