fn main() {
    if let Err(error) = screengen_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
