use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use todo_client::config::{Config, API_URL_VAR};
use todo_client::error::ClientError;
use todo_client::routes::Route;
use todo_client::views::{DetailView, ListView, TodoForm};
use todo_client::{connect, RestStore};

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Command-line client for a REST todo service")]
struct Cli {
    /// Base URL of the todo service.
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show all todos.
    List,
    /// Show the page behind a client route, e.g. `/todo/3?checked=false`.
    Open { route: Route },
    /// Add a todo.
    Add { title: String, content: String },
    /// Change a todo's title and/or content.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Toggle completion from a detail route.
    Toggle { route: Route },
    /// Delete a todo.
    Rm { id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = match cli.api_url.as_deref() {
        Some(url) => Config::new(url)?,
        None => Config::from_env()?,
    };
    let store = connect(&config)?;

    match cli.command {
        Command::List => show(store, Route::List).await,
        Command::Open { route } => show(store, route).await,
        Command::Add { title, content } => {
            let mut form = TodoForm::new(Arc::clone(&store));
            form.set_title(title);
            form.set_content(content);
            form.submit().await?;
            show(store, Route::List).await
        }
        Command::Edit { id, title, content } => {
            let list = ListView::mount(Arc::clone(&store)).await;
            let row = list.row(id).ok_or(ClientError::NotFound(id))?;
            row.begin_edit();
            if let Some(title) = title {
                row.set_title(title);
            }
            if let Some(content) = content {
                row.set_content(content);
            }
            row.submit_edit().await?;
            print!("{}", list.render());
            Ok(())
        }
        Command::Toggle { route } => {
            let detail = match route {
                Route::Detail(detail) => detail,
                Route::List => return Err(ClientError::InvalidRoute(Route::List.to_string())),
            };
            store.fetch_all().await?;
            let next = DetailView::new(Arc::clone(&store), detail).toggle().await?;
            println!("-> {next}");
            show(store, next).await
        }
        Command::Rm { id } => {
            store.delete(id).await?;
            show(store, Route::List).await
        }
    }
}

async fn show(store: Arc<RestStore>, route: Route) -> Result<(), ClientError> {
    match route {
        Route::List => {
            let list = ListView::mount(store).await;
            print!("{}", list.render());
        }
        Route::Detail(detail) => {
            if store.collection().is_none() {
                store.fetch_all().await?;
            }
            print!("{}", DetailView::new(store, detail).render());
        }
    }
    Ok(())
}
