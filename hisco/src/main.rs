use hisco::command_argument_builder;
use hisco::handlers::{handle_harvest, init_tracing, targets_for};
use hisco_core::banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Banner goes to stderr so stdout stays pure N-Triples
    if !quiet {
        eprintln!("{}", banner());
    }

    let Some((name, sub_matches)) = chosen_command.subcommand() else {
        return;
    };

    init_tracing(quiet);

    match targets_for(name) {
        Some(targets) => handle_harvest(sub_matches, targets, quiet).await,
        None => unreachable!("clap should ensure we don't get here"),
    }
}
