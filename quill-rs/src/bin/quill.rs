//! CLI for quill: show handler resolution, scaffold messages, run the in-memory demo.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quill_core::config::{DEFAULT_CACHE_PREFIX, DEFAULT_RESOLUTION_TTL_SECS};
use quill_core::{conventional_handler_name, DispatchConfig, MessageKind};
use quill_rs::blog::commands::{ArchiveBlogPost, CreateBlogPost, PublishBlogPost};
use quill_rs::blog::queries::{GetBlogPost, ListBlogPosts};
use quill_rs::domain::PostFilters;
use quill_rs::scaffold;
use quill_rs::users::commands::{RegisterUser, VerifyUserEmail};
use quill_rs::users::queries::GetUser;
use quill_rs::{build_mediator, Backend};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

type CliResult = Result<(), Box<dyn Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill command/query mediator CLI", version)]
struct Cli {
    #[command(flatten)]
    dispatch: DispatchArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DispatchArgs {
    /// How long resolved handler bindings stay cached
    #[arg(long, env = "QUILL_RESOLUTION_TTL_SECS", default_value_t = DEFAULT_RESOLUTION_TTL_SECS, global = true)]
    resolution_ttl_secs: u64,
    /// Prefix of resolution cache keys
    #[arg(long, env = "QUILL_CACHE_PREFIX", default_value = DEFAULT_CACHE_PREFIX, global = true)]
    cache_prefix: String,
}

impl From<DispatchArgs> for DispatchConfig {
    fn from(args: DispatchArgs) -> Self {
        DispatchConfig {
            resolution_ttl_secs: args.resolution_ttl_secs,
            cache_prefix: args.cache_prefix,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the conventional handler name for a message type path.
    Resolve {
        /// e.g. app::blog::commands::CreateBlogPost or App.Blog.Commands.CreateBlogPost
        message: String,
    },
    /// Append a command (or query) and its handler to a context directory.
    AddCommand {
        /// Context directory name (e.g. blog)
        context: String,
        /// Message name in PascalCase (e.g. FeaturePost)
        name: String,
        /// Generate a query instead of a command
        #[arg(long)]
        query: bool,
        /// Result type of the handler
        #[arg(long)]
        output: Option<String>,
        /// Directory that holds the context directories
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Run a scripted scenario against the in-memory store.
    Demo,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quill=info,quill_rs=info,quill_core=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn print_step<T: Serialize>(step: &str, result: &T) -> CliResult {
    let line = serde_json::json!({ "step": step, "result": result });
    println!("{}", serde_json::to_string_pretty(&line)?);
    Ok(())
}

async fn run_demo(config: DispatchConfig) -> CliResult {
    let (backend, _store) = Backend::in_memory();
    let mediator = build_mediator(backend, config)?;

    let registration = mediator
        .dispatch(RegisterUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.org".into(),
        })
        .await?;
    print_step("register user", &registration)?;

    mediator
        .dispatch(VerifyUserEmail {
            token: registration.verification_token.clone(),
        })
        .await?;
    let user = mediator.ask(GetUser { id: registration.user_id }).await?;
    print_step("verify email", &user)?;

    let post_id = mediator
        .dispatch(CreateBlogPost {
            title: "Hello, Quill".into(),
            content: "Commands go through the bus, queries too.".into(),
            author_id: user.id,
            tags: vec!["Rust".into(), "CQRS".into()],
        })
        .await?;
    print_step("create post", &post_id)?;

    mediator.dispatch(PublishBlogPost { id: post_id }).await?;
    print_step("publish post", &mediator.ask(GetBlogPost { id: post_id }).await?)?;

    let page = mediator
        .ask(ListBlogPosts {
            filters: PostFilters::default(),
        })
        .await?;
    print_step("list posts", &page)?;

    mediator.dispatch(ArchiveBlogPost { id: post_id }).await?;
    print_step("archive post", &mediator.ask(GetBlogPost { id: post_id }).await?)?;

    if let Err(err) = mediator.dispatch(PublishBlogPost { id: post_id }).await {
        print_step("publish archived post", &err.to_string())?;
    }
    info!("demo finished");
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { message } => {
            println!("{}", conventional_handler_name(&message));
            Ok(())
        }
        Commands::AddCommand {
            context,
            name,
            query,
            output,
            root,
        } => {
            let kind = if query { MessageKind::Query } else { MessageKind::Command };
            let done = scaffold::add_message(&root, &context, &name, kind, output.as_deref())?;
            println!(
                "Generated {} in {} and {} in {}",
                name,
                done.message_file.display(),
                done.handler,
                done.handler_file.display()
            );
            println!("Register it in {}'s module:\n    {}", context, done.registration);
            Ok(())
        }
        Commands::Demo => run_demo(cli.dispatch.into()).await,
    }
}
