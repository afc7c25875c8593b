use clap::Command;

mod collector;
mod errors;
mod heap;
mod repl;
mod scenario;
mod tests;

fn main() {
    env_logger::init();
    let _matches = Command::new("heapcrunch")
        .version("1.0")
        .about("step-by-step REPL for a mark-compact garbage collection cycle")
        .get_matches();
    repl::serve_repl();
}
