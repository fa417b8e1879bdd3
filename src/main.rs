fn main() {
    if let Err(err) = langcloud::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
