fn main() {
    env_logger::init();
    if let Err(err) = noteboard::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
