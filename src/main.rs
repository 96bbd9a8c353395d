fn main() {
    if let Err(err) = csv_cleaner::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
