fn main() {
    if let Err(err) = linkroute::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
