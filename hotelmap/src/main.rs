use hotelmap::commands::command_argument_builder;
use hotelmap::handlers::{RunArgs, handle_run, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command_argument_builder().get_matches();
    let args = RunArgs::from_matches(&matches);

    init_tracing(args.verbose);

    handle_run(args).await
}
