use clap::Parser;
use clap::Subcommand;
use identity_service::outbound::grpc::GrpcIdentityClient;

/// Command-line client for the identity service.
#[derive(Debug, Parser)]
#[command(name = "identity-cli", version)]
struct Cli {
    /// gRPC endpoint of the identity service
    #[arg(
        long,
        env = "IDENTITY_SERVICE_URL",
        default_value = "http://127.0.0.1:50051"
    )]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new identity
    Register { username: String, password: String },
    /// Log in and print a bearer token
    Login { username: String, password: String },
    /// List registered usernames
    List,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let client = GrpcIdentityClient::connect(&cli.endpoint).await?;

    match cli.command {
        Command::Register { username, password } => {
            let identity_id = client.register(&username, &password).await?;
            println!("Identity registered with ID: {}", identity_id);
        }
        Command::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            println!("Login successful. Token: {}", token);
        }
        Command::List => {
            let usernames = client.list_identities().await?;
            println!("Registered identities:");
            for username in usernames {
                println!("- {}", username);
            }
        }
    }

    Ok(())
}
