fn main() {
    if let Err(err) = coursemap::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
