use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;
use clap::Subcommand;

use crate::dispatch::forms::field;
use crate::dispatch::{FormFields, FormId};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile to read the server and connection settings from. Default is 'default'.
    /// If the profile is not configured, built-in defaults are used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Server override
    /// Optional. Base URL of the backend, taking precedence over the profile.
    #[clap(short = 's', long, help = "server base URL")]
    server: Option<String>,

    /// Verbose mode
    /// Optional. Print debug diagnostics to stderr.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,

    #[command(subcommand)]
    command: ClapCommand,
}

#[derive(Subcommand, Debug)]
enum ClapCommand {
    /// Register a new user
    Register {
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        email: Option<String>,
        #[clap(long)]
        password: Option<String>,
    },
    /// Log in with a username or email
    Login {
        #[clap(long = "user", help = "username or email")]
        username_or_email: Option<String>,
        #[clap(long)]
        password: Option<String>,
    },
    /// Blog post operations
    #[command(subcommand)]
    Post(PostCommand),
    /// Comment operations
    #[command(subcommand)]
    Comment(CommentCommand),
    /// Submit every form listed in a JSON file concurrently
    Batch {
        /// JSON array of {"form": ..., "fields": {...}} objects
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum PostCommand {
    /// Create a blog post
    Create {
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
    },
    /// Update a blog post
    Update {
        post_id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
    },
    /// Delete a blog post
    Delete { post_id: String },
    /// List all blog posts
    List,
    /// Show one blog post
    Show { post_id: String },
}

#[derive(Subcommand, Debug)]
enum CommentCommand {
    /// Comment on a blog post
    Create {
        #[clap(long)]
        post_id: String,
        #[clap(long = "name")]
        commenter_name: Option<String>,
        #[clap(long = "text")]
        comment_text: Option<String>,
    },
    /// Update a comment
    Update {
        comment_id: String,
        #[clap(long)]
        post_id: String,
        #[clap(long = "name")]
        commenter_name: Option<String>,
        #[clap(long = "text")]
        comment_text: Option<String>,
    },
    /// Delete a comment
    Delete { comment_id: String },
    /// List all comments
    List,
    /// Show one comment
    Show { comment_id: String },
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submit one form with the given field values
    Submit { form: FormId, fields: FormFields },
    /// Submit every entry of a batch file
    Batch { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    server: Option<String>,
    verbose: bool,
    action: Action,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::try_parse_from(itr).map(Self::from_clap)
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            server: args.server,
            verbose: args.verbose,
            action: args.command.into_action(),
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// Collect the provided values into form fields; absent options are left
/// out so they read as empty.
fn fields<const N: usize>(values: [(&str, Option<String>); N]) -> FormFields {
    values
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}

impl ClapCommand {
    fn into_action(self) -> Action {
        let (form, fields) = match self {
            ClapCommand::Register {
                username,
                email,
                password,
            } => (
                FormId::Register,
                fields([
                    (field::USERNAME, username),
                    (field::EMAIL, email),
                    (field::PASSWORD, password),
                ]),
            ),
            ClapCommand::Login {
                username_or_email,
                password,
            } => (
                FormId::Login,
                fields([
                    (field::USERNAME_OR_EMAIL, username_or_email),
                    (field::PASSWORD, password),
                ]),
            ),
            ClapCommand::Post(command) => command.into_submission(),
            ClapCommand::Comment(command) => command.into_submission(),
            ClapCommand::Batch { file } => return Action::Batch { path: file },
        };
        Action::Submit { form, fields }
    }
}

impl PostCommand {
    fn into_submission(self) -> (FormId, FormFields) {
        match self {
            PostCommand::Create { title, content } => (
                FormId::CreatePost,
                fields([(field::TITLE, title), (field::CONTENT, content)]),
            ),
            PostCommand::Update {
                post_id,
                title,
                content,
            } => (
                FormId::UpdatePost,
                fields([
                    (field::POST_ID, Some(post_id)),
                    (field::TITLE, title),
                    (field::CONTENT, content),
                ]),
            ),
            PostCommand::Delete { post_id } => (
                FormId::DeletePost,
                fields([(field::POST_ID, Some(post_id))]),
            ),
            PostCommand::List => (FormId::ListPosts, FormFields::new()),
            PostCommand::Show { post_id } => {
                (FormId::ShowPost, fields([(field::POST_ID, Some(post_id))]))
            }
        }
    }
}

impl CommentCommand {
    fn into_submission(self) -> (FormId, FormFields) {
        match self {
            CommentCommand::Create {
                post_id,
                commenter_name,
                comment_text,
            } => (
                FormId::CreateComment,
                fields([
                    (field::POST_ID, Some(post_id)),
                    (field::COMMENTER_NAME, commenter_name),
                    (field::COMMENT_TEXT, comment_text),
                ]),
            ),
            CommentCommand::Update {
                comment_id,
                post_id,
                commenter_name,
                comment_text,
            } => (
                FormId::UpdateComment,
                fields([
                    (field::COMMENT_ID, Some(comment_id)),
                    (field::POST_ID, Some(post_id)),
                    (field::COMMENTER_NAME, commenter_name),
                    (field::COMMENT_TEXT, comment_text),
                ]),
            ),
            CommentCommand::Delete { comment_id } => (
                FormId::DeleteComment,
                fields([(field::COMMENT_ID, Some(comment_id))]),
            ),
            CommentCommand::List => (FormId::ListComments, FormFields::new()),
            CommentCommand::Show { comment_id } => (
                FormId::ShowComment,
                fields([(field::COMMENT_ID, Some(comment_id))]),
            ),
        }
    }
}
