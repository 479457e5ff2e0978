#![forbid(unsafe_code)]

fn main() -> std::process::ExitCode {
    soldium_cli::main_entry()
}
