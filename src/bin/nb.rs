//! Short binary name (`nb`) that forwards to the `noteboard` library.
//! Keeping the alias as a real binary avoids shell alias requirements.

fn main() {
    env_logger::init();
    if let Err(err) = noteboard::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
