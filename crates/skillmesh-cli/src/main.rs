use skillmesh_cli::output;
use skillmesh_cli::router::CommandRouter;

#[tokio::main]
async fn main() {
    let result = CommandRouter::route().await;

    if let Err(e) = result {
        output::print_error(&e.user_message());
        std::process::exit(1);
    }
}
