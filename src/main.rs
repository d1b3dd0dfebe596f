fn main() {
    if let Err(e) = voxpaint::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
