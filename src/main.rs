fn main() {
    let code = scopehud::app::startup::run();
    std::process::exit(code);
}
