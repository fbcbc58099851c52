//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    waymark_cli::logging::init();
    if let Err(err) = waymark_cli::run() {
        eprintln!("waymark: {err}");
        std::process::exit(1);
    }
}
