use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use scriptwright_core::{ScriptwrightConfig, WebTemplate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "scriptwright", version, about = "Schema-driven site script editor")]
struct Cli {
    /// Configuration file. Defaults apply when it does not exist.
    #[arg(long, global = true, env = "SCRIPTWRIGHT_CONFIG", default_value = "scriptwright.yaml")]
    config: PathBuf,

    /// Schema locator or inline JSON, overriding `schema.source`.
    #[arg(long, global = true)]
    schema: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the verbs that can be added at the root, or under --parent.
    Verbs {
        #[arg(long)]
        parent: Option<String>,
    },

    /// Show the editable fields of a verb.
    Describe {
        verb: String,

        /// Parent verb when VERB is a sub-action.
        #[arg(long)]
        parent: Option<String>,
    },

    /// Stored script management (list/show/new/delete)
    Scripts {
        #[command(subcommand)]
        cmd: ScriptsCommand,
    },

    /// Site design management (list/show/new/delete)
    Designs {
        #[command(subcommand)]
        cmd: DesignsCommand,
    },

    /// Apply a YAML or JSON list of edit operations to a stored script, then save it.
    Edit {
        id: String,

        #[arg(long)]
        ops: PathBuf,

        /// Apply the edits and print the result without saving.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ScriptsCommand {
    /// List stored scripts
    List,

    /// Print a stored script as JSON
    Show { id: String },

    /// Create and save an empty script
    New {
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a stored script
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum DesignsCommand {
    /// List stored site designs
    List,

    /// Print a stored site design as JSON
    Show { id: String },

    /// Create and save a site design from stored scripts
    New {
        title: String,

        #[arg(long, value_enum, default_value_t = TemplateArg::Team)]
        web_template: TemplateArg,

        /// Script id to run; repeat for several, in execution order.
        #[arg(long = "script")]
        scripts: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Offer the design by default for its site template.
        #[arg(long, default_value_t = false)]
        default: bool,
    },

    /// Delete a stored site design
    Delete { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TemplateArg {
    Team,
    Communication,
}

impl From<TemplateArg> for WebTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Team => WebTemplate::TeamSite,
            TemplateArg::Communication => WebTemplate::CommunicationSite,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ScriptwrightConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if cli.schema.is_some() {
        config.schema.source = cli.schema.clone();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Verbs { parent } => {
            let resolver = commands::load_resolver(&config).await?;
            let verbs = commands::schema::verbs(&resolver, parent.as_deref())?;
            commands::schema::print_verbs(&verbs, parent.as_deref());
        }

        Command::Describe { verb, parent } => {
            let resolver = commands::load_resolver(&config).await?;
            let fields = commands::schema::describe(&resolver, &verb, parent.as_deref())?;
            commands::schema::print_fields(&verb, &fields);
        }

        Command::Scripts { cmd } => {
            let store = commands::open_store(&config)?;
            match cmd {
                ScriptsCommand::List => {
                    let summaries = commands::scripts::list(store.as_ref()).await?;
                    commands::scripts::print_summaries(&summaries);
                }
                ScriptsCommand::Show { id } => {
                    let script = commands::scripts::show(store.as_ref(), &id).await?;
                    println!("{}", serde_json::to_string_pretty(&script)?);
                }
                ScriptsCommand::New { title, description } => {
                    let resolver = commands::load_resolver(&config).await?;
                    let script = commands::scripts::create(
                        resolver,
                        store,
                        &title,
                        &description,
                        &config.editor,
                    )
                    .await?;
                    println!(
                        "✔ Created script '{}' ({})",
                        script.title,
                        script.id.as_deref().unwrap_or_default()
                    );
                }
                ScriptsCommand::Delete { id } => {
                    commands::scripts::delete(store.as_ref(), &id).await?;
                    println!("✔ Deleted script {}", id);
                }
            }
        }

        Command::Designs { cmd } => {
            let designs = commands::open_design_store(&config)?;
            match cmd {
                DesignsCommand::List => {
                    let listed = commands::designs::list(designs.as_ref()).await?;
                    commands::designs::print_designs(&listed);
                }
                DesignsCommand::Show { id } => {
                    let design = commands::designs::show(designs.as_ref(), &id).await?;
                    println!("{}", serde_json::to_string_pretty(&design)?);
                }
                DesignsCommand::New {
                    title,
                    web_template,
                    scripts,
                    description,
                    default,
                } => {
                    let store = commands::open_store(&config)?;
                    let new = commands::designs::NewDesign {
                        title,
                        description,
                        web_template: web_template.into(),
                        script_ids: scripts,
                        is_default: default,
                    };
                    let design =
                        commands::designs::create(designs.as_ref(), store.as_ref(), new).await?;
                    println!(
                        "✔ Created site design '{}' ({})",
                        design.title,
                        design.id.as_deref().unwrap_or_default()
                    );
                }
                DesignsCommand::Delete { id } => {
                    commands::designs::delete(designs.as_ref(), &id).await?;
                    println!("✔ Deleted site design {}", id);
                }
            }
        }

        Command::Edit { id, ops, dry_run } => {
            let resolver = commands::load_resolver(&config).await?;
            let store = commands::open_store(&config)?;
            let outcome =
                commands::edit::run(resolver, store, &id, &ops, &config.editor, dry_run).await?;
            commands::edit::print_outcome(&outcome, dry_run)?;
        }
    }

    Ok(())
}
