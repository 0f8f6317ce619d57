use clap::Parser;
use fincalc::cli::{Cli, run};

#[tokio::main]
async fn main() {
    fincalc::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
