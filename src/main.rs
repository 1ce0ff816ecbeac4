fn main() {
    if let Err(err) = graphinate::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
