use qpscrutiniser::utils::{self, Level};

fn main() {
    if let Err(e) = qpscrutiniser::app::run_cli() {
        utils::print_status(Level::Error, &e);
        std::process::exit(1);
    }
}
