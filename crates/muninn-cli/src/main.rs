mod cmd_anchors;
mod cmd_conversations;
mod cmd_insights;
mod cmd_pending;
mod cmd_similar;
mod cmd_status;
mod cmd_timeline;
mod cmd_topics;
mod cmd_xref;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use muninn_ingest::{resolve_data_root, Snapshot, StorePaths};

#[derive(Parser)]
#[command(
    name = "muninn",
    version,
    about = "Read-only dashboard over synced AI conversation memory"
)]
struct Cli {
    /// Data root (default: $MUNINN_DATA_DIR, else the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show per-source load state and headline counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List synced conversations
    Conversations {
        /// Only one tool namespace: claude or gemini
        #[arg(long)]
        tool: Option<String>,
        /// Case-insensitive match on title, id, and tags
        #[arg(long)]
        search: Option<String>,
        /// Oldest activity first instead of newest
        #[arg(long)]
        oldest_first: bool,
        /// Maximum rows (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// The insight table: filter, search, sort
    Insights {
        /// Only one category ("uncategorized" matches unlabeled insights)
        #[arg(long)]
        category: Option<String>,
        /// Only one source tool namespace (e.g. "claude-cli")
        #[arg(long)]
        source: Option<String>,
        /// Case-insensitive match on content, category, and source
        #[arg(long)]
        search: Option<String>,
        /// Sort column: content, category, source, strength, chat_date, generated
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending (the default chat_date sort already is)
        #[arg(long)]
        desc: bool,
        /// Maximum rows (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List anchors grouped by category
    Anchors {
        /// Only one category ("uncategorized" matches unlabeled anchors)
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match on statement, category, and notes
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Topic cloud weights, or the top insights of one topic
    Topics {
        /// Rank insights within this category instead of listing the cloud
        #[arg(long)]
        category: Option<String>,
        /// Ranking order: recency, strength, or weakness (needs --category)
        #[arg(long)]
        order: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Insight activity over time
    Timeline {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cross-reference lookups between conversations and insights
    Xref {
        #[command(subcommand)]
        cmd: XrefCommand,
    },
    /// Anchors with statements similar to the given text
    Similar {
        /// Candidate statement to compare against every anchor
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Insights still waiting for a review decision
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum XrefCommand {
    /// Insights whose evidence cites the given conversation
    Conversation {
        /// Conversation id (exact)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Synced conversations matched by the given insight's evidence
    Insight {
        /// Insight id (exact)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let root = resolve_data_root(cli.data_dir.as_deref());
    let paths = StorePaths::discover(root);
    let snapshot = Snapshot::load(&paths);

    match cli.cmd {
        Command::Status { json } => cmd_status::execute(&paths, &snapshot, json),
        Command::Conversations {
            tool,
            search,
            oldest_first,
            limit,
            json,
        } => cmd_conversations::execute(
            &snapshot,
            tool.as_deref(),
            search.as_deref(),
            oldest_first,
            limit,
            json,
        ),
        Command::Insights {
            category,
            source,
            search,
            sort,
            desc,
            limit,
            json,
        } => cmd_insights::execute(
            &snapshot,
            cmd_insights::InsightsParams {
                category,
                source,
                search,
                sort: sort.as_deref(),
                desc,
                limit,
                json,
            },
        ),
        Command::Anchors {
            category,
            search,
            json,
        } => cmd_anchors::execute(&snapshot, category, search, json),
        Command::Topics {
            category,
            order,
            json,
        } => cmd_topics::execute(&snapshot, category.as_deref(), order.as_deref(), json),
        Command::Timeline { json } => cmd_timeline::execute(&snapshot, json),
        Command::Xref { cmd } => match cmd {
            XrefCommand::Conversation { id, json } => cmd_xref::conversation(&snapshot, &id, json),
            XrefCommand::Insight { id, json } => cmd_xref::insight(&snapshot, &id, json),
        },
        Command::Similar { text, json } => cmd_similar::execute(&snapshot, &text, json),
        Command::Pending { json } => cmd_pending::execute(&snapshot, json),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MUNINN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
