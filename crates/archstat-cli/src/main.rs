fn main() {
    std::process::exit(archstat_cli::run_from_env());
}
