fn main() {
    if let Err(e) = packdoc::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
