fn main() {
    if let Err(e) = lsif_bundle_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
