use anyhow::Result;
use clap::Parser;
use simple_crud_api::{
    config::{self, Cli, Command, ProvisionArgs, ServeArgs},
    handler::UserHandler,
    provision,
    router::create_app,
    store::{DynamoUserStore, InMemoryUserStore, UserStore},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Provision(args) => provision_table(args).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "simple_crud_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let options = args.store_options();
    let store: Arc<dyn UserStore> = if args.in_memory {
        tracing::warn!("using the in-memory store, users are lost on exit");
        Arc::new(InMemoryUserStore::new(options))
    } else {
        let client = config::dynamodb_client(args.endpoint_url.as_deref()).await;
        tracing::info!(
            table = %args.table_name,
            status_index = %args.status_index_name,
            "using DynamoDB store"
        );
        Arc::new(DynamoUserStore::new(
            client,
            args.table_name.as_str(),
            args.status_index_name.as_str(),
            options,
        ))
    };

    let app = create_app(UserHandler::new(store));
    let listener = TcpListener::bind(args.bind_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn provision_table(args: ProvisionArgs) -> Result<()> {
    let client = config::dynamodb_client(args.endpoint_url.as_deref()).await;
    let definition = args.table_definition();
    let outcome = provision::ensure_table(&client, &definition).await?;
    tracing::info!(table = %definition.table_name, ?outcome, "provisioning done");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
