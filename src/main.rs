use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenv::dotenv;
use linkpost_rs::adk::error::WorkflowError;
use linkpost_rs::adk::generation::ModelGenerationService;
use linkpost_rs::adk::model::openai::OpenAIModel;
use linkpost_rs::adk::model::Model;
use linkpost_rs::linkpost::config::{Config, TEMPLATES_VAR};
use linkpost_rs::linkpost::content::{ContentGenerator, PostBrief, DEFAULT_SLIDES};
use linkpost_rs::linkpost::scheduler::{PostScheduler, ScheduleOutcome};
use linkpost_rs::linkpost::server::{self, AppState};
use linkpost_rs::linkpost::templates::TemplateStore;
use linkpost_rs::linkpost::workflow::approval::AutoApprove;
use linkpost_rs::linkpost::workflow::debate::Debate;
use linkpost_rs::linkpost::workflow::sink::FileSink;
use linkpost_rs::linkpost::workflow::{
    build_post_workflow, PostWorkflowDeps, RetryPolicy, WorkflowState,
};

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Post parameters shared by `post` and `workflow`
#[derive(ClapArgs, Debug)]
struct BriefArgs {
    /// What the post is about
    #[arg(short, long)]
    topic: String,

    #[arg(long, default_value = "professionals")]
    audience: String,

    #[arg(long, default_value = "educate")]
    goal: String,

    #[arg(long, default_value = "professional")]
    tone: String,

    /// Approximate word range, e.g. 150-200
    #[arg(long, default_value = "150-200")]
    length: String,

    /// Comma-separated keywords
    #[arg(long, default_value = "")]
    keywords: String,

    #[arg(long, default_value = "")]
    cta: String,
}

impl BriefArgs {
    fn brief(self) -> anyhow::Result<PostBrief> {
        Ok(PostBrief::new(self.topic)?
            .audience(self.audience)
            .goal(self.goal)
            .tone(self.tone)
            .length(self.length)
            .keywords(self.keywords)
            .cta(self.cta))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Generate a text post with hooks and hashtags
    Post {
        #[command(flatten)]
        brief: BriefArgs,
    },
    /// Generate carousel slides
    Carousel {
        #[arg(short, long)]
        topic: String,

        #[arg(short, long, default_value_t = DEFAULT_SLIDES)]
        slides: usize,
    },
    /// Print a post template
    Template {
        #[arg(short, long)]
        name: String,
    },
    /// Run the drafting workflow with self-correction
    Workflow {
        #[command(flatten)]
        brief: BriefArgs,

        /// Override the retry bound of the correction loop
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Schedule a post and wait until it is published
    Schedule {
        #[arg(short, long)]
        post: String,

        /// Local time as YYYY-MM-DD HH:MM
        #[arg(long)]
        time: String,

        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
}

fn load_templates(file: Option<PathBuf>) -> anyhow::Result<TemplateStore> {
    let mut store = TemplateStore::builtin();
    if let Some(path) = file {
        let added = store
            .merge_yaml_file(&path)
            .with_context(|| format!("loading templates from {}", path.display()))?;
        log::info!("Loaded {} templates from {}", added, path.display());
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Template { name } => {
            let file = std::env::var(TEMPLATES_VAR).ok().map(PathBuf::from);
            let store = load_templates(file)?;
            match store.get(&name) {
                Some(template) => println!("{}", template.render()),
                None => anyhow::bail!(
                    "Template \"{}\" not found. Available: {}",
                    name,
                    store.names().join(", ")
                ),
            }
        }
        Commands::Schedule {
            post,
            time,
            timezone,
        } => {
            let scheduler = PostScheduler::new();
            let outcome = scheduler.schedule(&post, &time, &timezone).await?;
            println!("{}", outcome.message());
            if matches!(outcome, ScheduleOutcome::Scheduled { .. }) {
                scheduler.wait_all().await;
            }
        }
        Commands::Serve { host, port } => {
            let (config, _, content) = providers()?;
            let templates = load_templates(config.templates_file.clone())?;
            let state = AppState::new(content, templates);
            server::serve(state, SocketAddr::new(host, port)).await?;
        }
        Commands::Post { brief } => {
            let brief = brief.brief()?;
            let (config, _, content) = providers()?;
            let text = content.text_post(&brief).await.render();
            println!("{}", text);

            let path = save_post(&config.output_dir, &text).await?;
            println!("\nSaved to {}", path.display());
        }
        Commands::Carousel { topic, slides } => {
            if topic.trim().is_empty() {
                anyhow::bail!("Topic is required");
            }
            let (_, _, content) = providers()?;
            println!("{}", content.carousel(topic.trim(), slides).await);
        }
        Commands::Workflow { brief, max_retries } => {
            let state = WorkflowState::new(brief.brief()?);
            let (config, model, content) = providers()?;
            let graph = build_post_workflow(PostWorkflowDeps {
                content,
                debate: Debate::with_model(model),
                approval: Arc::new(AutoApprove),
                sink: Arc::new(FileSink::new(&config.output_dir)),
                policy: RetryPolicy::with_retries(max_retries.unwrap_or(config.max_retries)),
            })?;

            match graph.run(state).await {
                Ok(state) => {
                    if let Some(draft) = &state.draft {
                        println!("{}\n\n{}", draft.content, draft.hashtags.join(" "));
                    }
                    println!("\nApproved: {}", state.approved);
                }
                Err(WorkflowError::RetryLimitExceeded { retries, state }) => {
                    anyhow::bail!(
                        "Gave up after {} retries. Outstanding corrections: {}",
                        retries,
                        state.corrections.join("; ")
                    );
                }
                Err(WorkflowError::StepLimitExceeded { steps, state }) => {
                    anyhow::bail!(
                        "Stopped after {} steps. Outstanding corrections: {}",
                        steps,
                        state.corrections.join("; ")
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Configuration plus the model-backed collaborators
fn providers() -> anyhow::Result<(Config, Arc<dyn Model>, Arc<ContentGenerator>)> {
    let config = Config::from_env()?;
    log::info!("Using model {} at {}", config.model_name, config.base_url);

    let model: Arc<dyn Model> = Arc::new(OpenAIModel::from_config(&config));
    let service = Arc::new(ModelGenerationService::new(model.clone()));
    Ok((config, model, Arc::new(ContentGenerator::new(service))))
}

/// Save under `<dir>/<timestamp>.txt`
async fn save_post(dir: &std::path::Path, post: &str) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.txt", chrono::Local::now().format("%Y%m%d_%H%M%S")));
    tokio::fs::write(&path, post)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
