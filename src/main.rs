//! Platefeed CLI — exercises the API client end to end from a terminal.

use clap::{Args, Parser, Subcommand};
use platefeed::Client;
use platefeed::gateway::types::ApiError;
use platefeed::services::auth::NewUser;
use platefeed::services::posts::PostDraft;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `platefeed login` first")]
    NotLoggedIn,
    #[error("api call failed: {0}")]
    Api(#[from] ApiError),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "platefeed", about = "Platefeed food-discovery API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with username and password.
    Login {
        username: String,
        #[arg(long, env = "PLATEFEED_PASSWORD")]
        password: String,
    },
    /// Create an account, then log in.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PLATEFEED_PASSWORD")]
        password: String,
    },
    /// Clear the stored session.
    Logout,
    /// Show the current user.
    Whoami,
    /// Fetch a page of the feed.
    Feed {
        #[arg(long, help = "Only this author's posts")]
        user_id: Option<String>,
        #[arg(long, help = "Cursor: _id of the last post you have")]
        after: Option<String>,
    },
    Post(PostCommand),
    Comment(CommentCommand),
    /// Like a post.
    Like { post_id: String },
    /// Remove a like.
    Unlike { post_id: String },
    /// Update the current user's display name.
    SetUsername { username: String },
    /// Upload an image and set it as the profile picture.
    SetImage {
        path: String,
        #[arg(long, default_value = "image/jpeg")]
        content_type: String,
    },
    /// Ask for a restaurant recommendation.
    Recommend { description: String },
}

#[derive(Args, Debug)]
struct PostCommand {
    #[command(subcommand)]
    command: PostSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostSubcommand {
    Show {
        post_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, help = "Image URL already uploaded via set-image or /file")]
        image: String,
        #[arg(long)]
        rating: f64,
    },
    Delete {
        post_id: String,
    },
}

#[derive(Args, Debug)]
struct CommentCommand {
    #[command(subcommand)]
    command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
enum CommentSubcommand {
    List {
        post_id: String,
        #[arg(long, help = "Cursor: _id of the last comment you have")]
        after: Option<String>,
    },
    Add {
        post_id: String,
        content: String,
    },
    Edit {
        comment_id: String,
        content: String,
    },
    Delete {
        comment_id: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = match Client::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&client, cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(client: &Client, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let identity = client.auth.login(&username, &password).await?;
            println!("logged in as {} ({})", identity.username.unwrap_or_default(), identity.user_id);
            Ok(())
        }
        Command::Register { username, email, password } => {
            client
                .auth
                .register(&NewUser { email, username: username.clone(), password: password.clone(), profile_image: None })
                .await?;
            let identity = client.auth.login(&username, &password).await?;
            println!("registered and logged in as {}", identity.user_id);
            Ok(())
        }
        Command::Logout => {
            client.auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            match client.auth.current_user().await? {
                Some(user) => print_json(&user)?,
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Feed { user_id, after } => {
            let page = client.posts.feed(user_id.as_deref(), after.as_deref()).await?;
            print_json(&page.posts)?;
            if let Some(cursor) = page.last_post_id() {
                eprintln!("next page: --after {cursor}");
            }
            Ok(())
        }
        Command::Post(post) => run_post(client, post).await,
        Command::Comment(comment) => run_comment(client, comment).await,
        Command::Like { post_id } => {
            client.likes.like(&post_id).await?;
            println!("liked {post_id}");
            Ok(())
        }
        Command::Unlike { post_id } => {
            client.likes.unlike(&post_id).await?;
            println!("unliked {post_id}");
            Ok(())
        }
        Command::SetUsername { username } => {
            let user_id = client.store().user_id().ok_or(CliError::NotLoggedIn)?;
            let user = client.users.update_username(&user_id, &username).await?;
            print_json(&user)?;
            Ok(())
        }
        Command::SetImage { path, content_type } => {
            let user_id = client.store().user_id().ok_or(CliError::NotLoggedIn)?;
            let data = std::fs::read(&path)?;
            let filename = std::path::Path::new(&path)
                .file_name()
                .map_or_else(|| path.clone(), |f| f.to_string_lossy().into_owned());
            let url = client.users.upload_image(&filename, &content_type, data).await?;
            let user = client.users.update_profile_image(&user_id, &url).await?;
            print_json(&user)?;
            Ok(())
        }
        Command::Recommend { description } => {
            let recommendation = client.recommendations.restaurant(&description).await?;
            println!("{}: {}\n{}", recommendation.name, recommendation.description, recommendation.url);
            Ok(())
        }
    }
}

async fn run_post(client: &Client, post: PostCommand) -> Result<(), CliError> {
    match post.command {
        PostSubcommand::Show { post_id } => {
            let post = client.posts.get(&post_id).await?;
            print_json(&post)?;
            Ok(())
        }
        PostSubcommand::Create { title, content, image, rating } => {
            let posted_by = client.store().user_id().ok_or(CliError::NotLoggedIn)?;
            let post = client
                .posts
                .create(&PostDraft { posted_by, title, content, image, rating })
                .await?;
            print_json(&post)?;
            Ok(())
        }
        PostSubcommand::Delete { post_id } => {
            client.posts.delete(&post_id).await?;
            println!("deleted {post_id}");
            Ok(())
        }
    }
}

async fn run_comment(client: &Client, comment: CommentCommand) -> Result<(), CliError> {
    match comment.command {
        CommentSubcommand::List { post_id, after } => {
            let comments = client.comments.list(&post_id, after.as_deref()).await?;
            print_json(&comments)?;
            Ok(())
        }
        CommentSubcommand::Add { post_id, content } => {
            let comment = client.comments.create(&post_id, &content).await?;
            print_json(&comment)?;
            Ok(())
        }
        CommentSubcommand::Edit { comment_id, content } => {
            let comment = client.comments.update(&comment_id, &content).await?;
            print_json(&comment)?;
            Ok(())
        }
        CommentSubcommand::Delete { comment_id } => {
            client.comments.delete(&comment_id).await?;
            println!("deleted {comment_id}");
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
